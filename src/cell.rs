//! Quantum-classical hybrid spiking cell.
//!
//! A leaky integrate-and-fire membrane coupled to a two-amplitude
//! [`CoherenceState`]. Input current drives both the classical integration
//! and a unitary rotation of the amplitudes; the off-diagonal term decays
//! with time constant `coherence_time` (T2). Coherence feeds back into the
//! classical side through stochastic tunneling kicks, the only source of
//! sub-threshold firing.
//!
//! All randomness comes from a per-cell `StdRng` seeded at construction, so
//! two cells built with the same configuration and seed produce bit-identical
//! traces.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coherence::CoherenceState;
use crate::error::SimError;

/// Coupling between input current and amplitude rotation (rad per mV·ms of
/// drive). Chosen so that sustained supra-threshold drive saturates coherence
/// within a few membrane time constants.
const DRIVE_COUPLING: f64 = 0.05;

/// Immutable per-cell parameters. Units: ms for times, mV for potentials.
#[derive(Debug, Clone, PartialEq)]
pub struct CellConfig {
    /// Integration step size (ms, > 0).
    pub dt: f64,
    /// Probability weight for tunneling kicks, in [0, 1].
    pub tunneling_coefficient: f64,
    /// T2 decay constant for the coherence state (ms, > 0).
    pub coherence_time: f64,
    /// Spike threshold (mV). Must exceed the resting potential.
    pub threshold_potential: f64,
    /// Resting potential (mV).
    pub resting_potential: f64,
    /// Potential the membrane is reset to after a spike (mV).
    pub reset_potential: f64,
    /// Membrane leak time constant τ_m (ms, > 0).
    pub membrane_time_constant: f64,
    /// Refractory window after a spike during which no new spike is emitted
    /// (ms, ≥ 0).
    pub refractory_period: f64,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            tunneling_coefficient: 0.1,
            coherence_time: 100.0,
            threshold_potential: -55.0,
            resting_potential: -70.0,
            reset_potential: -70.0,
            membrane_time_constant: 20.0,
            refractory_period: 3.0,
        }
    }
}

impl CellConfig {
    /// Check every construction-time invariant. Never silently corrects.
    pub fn validate(&self) -> Result<(), SimError> {
        let fields = [
            (self.dt, "dt"),
            (self.tunneling_coefficient, "tunneling_coefficient"),
            (self.coherence_time, "coherence_time"),
            (self.threshold_potential, "threshold_potential"),
            (self.resting_potential, "resting_potential"),
            (self.reset_potential, "reset_potential"),
            (self.membrane_time_constant, "membrane_time_constant"),
            (self.refractory_period, "refractory_period"),
        ];
        for (value, name) in fields {
            if !value.is_finite() {
                return Err(SimError::InvalidConfiguration(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if self.dt <= 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if self.coherence_time <= 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "coherence_time must be positive, got {}",
                self.coherence_time
            )));
        }
        if self.membrane_time_constant <= 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "membrane_time_constant must be positive, got {}",
                self.membrane_time_constant
            )));
        }
        if self.refractory_period < 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "refractory_period must be non-negative, got {}",
                self.refractory_period
            )));
        }
        if !(0.0..=1.0).contains(&self.tunneling_coefficient) {
            return Err(SimError::InvalidConfiguration(format!(
                "tunneling_coefficient must lie in [0, 1], got {}",
                self.tunneling_coefficient
            )));
        }
        if self.threshold_potential <= self.resting_potential {
            return Err(SimError::InvalidConfiguration(format!(
                "threshold_potential ({}) must exceed resting_potential ({})",
                self.threshold_potential, self.resting_potential
            )));
        }
        Ok(())
    }
}

/// One spiking cell: classical membrane plus owned coherence state.
#[derive(Debug, Clone)]
pub struct SpikingCell {
    id: String,
    config: CellConfig,
    state: CoherenceState,
    membrane_potential: f64,
    spike_count: u64,
    last_spike_time: Option<f64>,
    /// Elapsed simulated time (ms).
    time: f64,
    /// Time since the most recent spike; infinite until the first spike.
    time_since_spike: f64,
    rng: StdRng,
}

impl SpikingCell {
    /// Create a cell with the given identifier, configuration and RNG seed.
    ///
    /// Fails with [`SimError::InvalidConfiguration`] if any parameter
    /// violates its invariant.
    pub fn new(id: impl Into<String>, config: CellConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            id: id.into(),
            membrane_potential: config.resting_potential,
            config,
            state: CoherenceState::ground(),
            spike_count: 0,
            last_spike_time: None,
            time: 0.0,
            time_since_spike: f64::INFINITY,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Advance the cell by one step of `dt` under the given input current.
    ///
    /// Order of operations: leaky integration, tunneling kick, coherence
    /// rotation + decay, spike check. Returns `(spiked, membrane_potential)`.
    ///
    /// Non-finite input is rejected with [`SimError::InvalidInput`] before
    /// any state is touched.
    pub fn step(&mut self, input_current: f64) -> Result<(bool, f64), SimError> {
        if !input_current.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "input current must be finite, got {}",
                input_current
            )));
        }

        let dt = self.config.dt;
        self.time += dt;
        let refractory = self.time_since_spike < self.config.refractory_period;
        self.time_since_spike += dt;

        // Leaky integration: dV/dt = -(V - V_rest)/τ_m + I.
        let leak = -(self.membrane_potential - self.config.resting_potential)
            / self.config.membrane_time_constant;
        self.membrane_potential += dt * (leak + input_current);

        // Tunneling kick: fires with probability tunneling_coefficient ×
        // coherence, depolarizing by up to the rest-to-threshold gap. This is
        // the only path to firing without classical threshold crossing.
        if !refractory {
            let p_tunnel = self.config.tunneling_coefficient * self.state.coherence();
            if p_tunnel > 0.0 && self.rng.gen::<f64>() < p_tunnel {
                let gap = self.config.threshold_potential - self.config.resting_potential;
                self.membrane_potential += self.rng.gen::<f64>() * gap;
            }
        }

        // Drive rotates the amplitudes, then the off-diagonal term decays.
        self.state.rotate(input_current * dt * DRIVE_COUPLING);
        self.state.decay(dt, self.config.coherence_time);

        if !refractory && self.membrane_potential >= self.config.threshold_potential {
            self.spike_count += 1;
            self.last_spike_time = Some(self.time);
            self.time_since_spike = 0.0;
            self.membrane_potential = self.config.reset_potential;
            return Ok((true, self.membrane_potential));
        }
        Ok((false, self.membrane_potential))
    }

    /// Return the cell to its initial membrane and coherence state.
    ///
    /// The monotonic `spike_count` and `last_spike_time` survive; use
    /// [`SpikingCell::hard_reset`] to clear them as well.
    pub fn reset(&mut self) {
        self.membrane_potential = self.config.resting_potential;
        self.state = CoherenceState::ground();
        self.time = 0.0;
        self.time_since_spike = f64::INFINITY;
    }

    /// [`SpikingCell::reset`] plus clearing the spike counter and timestamp.
    pub fn hard_reset(&mut self) {
        self.reset();
        self.spike_count = 0;
        self.last_spike_time = None;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &CellConfig {
        &self.config
    }

    pub fn membrane_potential(&self) -> f64 {
        self.membrane_potential
    }

    /// Current off-diagonal coherence, in [0, 1].
    pub fn coherence(&self) -> f64 {
        self.state.coherence()
    }

    pub fn coherence_state(&self) -> &CoherenceState {
        &self.state
    }

    /// Total spikes emitted since construction (or the last `hard_reset`).
    pub fn spike_count(&self) -> u64 {
        self.spike_count
    }

    /// Simulated time of the most recent spike (ms), if any.
    pub fn last_spike_time(&self) -> Option<f64> {
        self.last_spike_time
    }

    /// Elapsed simulated time (ms).
    pub fn time(&self) -> f64 {
        self.time
    }
}
