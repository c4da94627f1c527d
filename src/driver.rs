//! Cell simulation driver.
//!
//! Runs a [`SpikingCell`] over a sequence of input currents, collecting the
//! membrane and coherence traces plus run-local spike statistics. Stepping is
//! strictly sequential (each step depends on the previous); restarting a run
//! requires an explicit reset on the cell.

use crate::cell::SpikingCell;
use crate::error::SimError;

/// Result of driving a cell over one input sequence.
#[derive(Debug, Clone)]
pub struct CellRun {
    /// Spikes emitted during this run (not the cell's cumulative counter).
    pub spike_count: u64,
    /// `spike_count / (len · dt / 1000)` in Hz; zero for an empty input.
    pub spike_rate_hz: f64,
    /// Membrane potential after each step; length equals the input length.
    pub membrane_trace: Vec<f64>,
    /// Coherence after each step; length equals the input length.
    pub coherence_trace: Vec<f64>,
    /// Membrane potential after the final step.
    pub final_potential: f64,
    /// Coherence after the final step.
    pub final_coherence: f64,
}

/// Drive `cell` through `inputs`, one step per element.
///
/// The whole input slice is validated before any mutation: a single
/// non-finite entry rejects the call with [`SimError::InvalidInput`] and the
/// cell is left exactly as it was.
pub fn run_cell(cell: &mut SpikingCell, inputs: &[f64]) -> Result<CellRun, SimError> {
    if let Some(pos) = inputs.iter().position(|i| !i.is_finite()) {
        return Err(SimError::InvalidInput(format!(
            "input current at index {} is not finite ({})",
            pos, inputs[pos]
        )));
    }

    let start_count = cell.spike_count();
    let mut membrane_trace = Vec::with_capacity(inputs.len());
    let mut coherence_trace = Vec::with_capacity(inputs.len());

    for &input in inputs {
        let (_, v) = cell.step(input)?;
        membrane_trace.push(v);
        coherence_trace.push(cell.coherence());
    }

    let spike_count = cell.spike_count() - start_count;
    let duration_s = inputs.len() as f64 * cell.config().dt / 1000.0;
    let spike_rate_hz = if duration_s > 0.0 {
        spike_count as f64 / duration_s
    } else {
        0.0
    };

    Ok(CellRun {
        spike_count,
        spike_rate_hz,
        membrane_trace,
        coherence_trace,
        final_potential: cell.membrane_potential(),
        final_coherence: cell.coherence(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellConfig;

    fn cell(seed: u64) -> SpikingCell {
        SpikingCell::new("drv", CellConfig::default(), seed).unwrap()
    }

    #[test]
    fn trace_length_matches_input_length() {
        let mut c = cell(1);
        let inputs = vec![10.0; 321];
        let run = run_cell(&mut c, &inputs).unwrap();
        assert_eq!(run.membrane_trace.len(), 321);
        assert_eq!(run.coherence_trace.len(), 321);
    }

    #[test]
    fn spike_rate_matches_formula() {
        let mut c = cell(2);
        let inputs = vec![20.0; 2000];
        let run = run_cell(&mut c, &inputs).unwrap();
        assert!(run.spike_count > 0);
        let expected = run.spike_count as f64 / (2000.0 * c.config().dt / 1000.0);
        assert!(
            (run.spike_rate_hz - expected).abs() < 1e-9,
            "rate {} vs expected {}",
            run.spike_rate_hz,
            expected
        );
    }

    #[test]
    fn empty_input_gives_empty_run() {
        let mut c = cell(3);
        let run = run_cell(&mut c, &[]).unwrap();
        assert_eq!(run.spike_count, 0);
        assert_eq!(run.spike_rate_hz, 0.0);
        assert!(run.membrane_trace.is_empty());
    }

    #[test]
    fn run_counts_are_run_local() {
        let mut c = cell(4);
        let inputs = vec![20.0; 1000];
        let first = run_cell(&mut c, &inputs).unwrap();
        c.reset(); // keeps the cumulative counter
        let second = run_cell(&mut c, &inputs).unwrap();
        assert!(first.spike_count > 0);
        assert_eq!(c.spike_count(), first.spike_count + second.spike_count);
    }

    #[test]
    fn non_finite_entry_rejects_whole_run_without_stepping() {
        let mut c = cell(5);
        c.step(5.0).unwrap();
        let v_before = c.membrane_potential();
        let t_before = c.time();

        let inputs = vec![1.0, 2.0, f64::NAN, 4.0];
        let err = run_cell(&mut c, &inputs).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
        // Not even the leading finite entries were applied.
        assert_eq!(c.membrane_potential(), v_before);
        assert_eq!(c.time(), t_before);
    }

    #[test]
    fn deterministic_runs_under_fixed_seed() {
        let inputs: Vec<f64> = (0..800).map(|i| (i as f64 * 0.02).cos() * 25.0).collect();
        let mut a = cell(77);
        let mut b = cell(77);
        let run_a = run_cell(&mut a, &inputs).unwrap();
        let run_b = run_cell(&mut b, &inputs).unwrap();
        assert_eq!(run_a.membrane_trace, run_b.membrane_trace);
        assert_eq!(run_a.coherence_trace, run_b.coherence_trace);
        assert_eq!(run_a.spike_count, run_b.spike_count);
    }
}
