//! Reality instances: independent node populations with a categorical type.
//!
//! Each instance owns an ordered vector of node activations, advanced per
//! cycle by a bounded local rule (damped neighbor diffusion plus per-type
//! noise), and three derived scalars — consciousness level, information
//! density, quantum coherence — recomputed from node-state statistics.
//!
//! Type-dependent constants live in one lookup table ([`TypeProfile`]) rather
//! than branching scattered across methods, so each type has a distinct,
//! testable steady state. Every instance owns its own `StdRng`, seeded from a
//! master seed plus the instance index; instances never reference one
//! another's node states.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Hard bound on node activation magnitude.
pub const NODE_BOUND: f64 = 5.0;

/// Diffusion mixing weight toward the neighbor mean per cycle.
const DIFFUSION_MIX: f64 = 0.1;

/// Relaxation rate of the derived scalars toward their per-cycle targets.
const ADAPTATION: f64 = 0.1;

/// Categorical reality type, assigned round-robin at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealityType {
    Individual,
    Collective,
    Planetary,
    Solar,
    Galactic,
    Universal,
    Multiversal,
    Absolute,
}

impl RealityType {
    /// All types, in round-robin assignment order.
    pub const ALL: [RealityType; 8] = [
        RealityType::Individual,
        RealityType::Collective,
        RealityType::Planetary,
        RealityType::Solar,
        RealityType::Galactic,
        RealityType::Universal,
        RealityType::Multiversal,
        RealityType::Absolute,
    ];

    /// Round-robin type for the instance at `index`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Label string (for output formatting).
    pub fn label(&self) -> &'static str {
        match self {
            RealityType::Individual => "individual",
            RealityType::Collective => "collective",
            RealityType::Planetary => "planetary",
            RealityType::Solar => "solar",
            RealityType::Galactic => "galactic",
            RealityType::Universal => "universal",
            RealityType::Multiversal => "multiversal",
            RealityType::Absolute => "absolute",
        }
    }

    /// Type-specific constants. Baselines sit in [0, 1] and rise with scale;
    /// noise falls with scale, so broader types run calmer and more coherent.
    pub fn profile(&self) -> TypeProfile {
        match self {
            RealityType::Individual => TypeProfile::new(0.12, 0.20, 0.10, 0.10),
            RealityType::Collective => TypeProfile::new(0.18, 0.25, 0.20, 0.09),
            RealityType::Planetary => TypeProfile::new(0.24, 0.30, 0.30, 0.08),
            RealityType::Solar => TypeProfile::new(0.30, 0.35, 0.40, 0.07),
            RealityType::Galactic => TypeProfile::new(0.36, 0.40, 0.55, 0.06),
            RealityType::Universal => TypeProfile::new(0.42, 0.50, 0.70, 0.05),
            RealityType::Multiversal => TypeProfile::new(0.48, 0.60, 0.85, 0.04),
            RealityType::Absolute => TypeProfile::new(0.54, 0.75, 1.00, 0.03),
        }
    }
}

/// Per-type constants: metric baselines and the node-noise scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeProfile {
    pub consciousness_baseline: f64,
    pub coherence_baseline: f64,
    pub information_baseline: f64,
    pub noise_scale: f64,
}

impl TypeProfile {
    const fn new(
        consciousness_baseline: f64,
        coherence_baseline: f64,
        information_baseline: f64,
        noise_scale: f64,
    ) -> Self {
        Self {
            consciousness_baseline,
            coherence_baseline,
            information_baseline,
            noise_scale,
        }
    }
}

/// One independent node population.
#[derive(Debug, Clone)]
pub struct RealityInstance {
    id: String,
    reality_type: RealityType,
    node_states: Vec<f64>,
    consciousness_level: f64,
    information_density: f64,
    quantum_coherence: f64,
    /// Mean |Δnode| of the most recent cycle; drives `active_signals`.
    last_change: f64,
    rng: StdRng,
}

impl RealityInstance {
    /// Build the instance at `index` with `nodes` activations.
    ///
    /// The RNG stream is derived deterministically from the master seed plus
    /// the index, so instances never contend on a shared generator and the
    /// whole network is reproducible from one seed.
    pub fn new(index: usize, nodes: usize, master_seed: u64) -> Self {
        let seed = master_seed.wrapping_add(index as u64 * 7919);
        let mut rng = StdRng::seed_from_u64(seed);
        let reality_type = RealityType::from_index(index);
        let profile = reality_type.profile();

        let node_states: Vec<f64> = (0..nodes).map(|_| (rng.gen::<f64>() - 0.5) * 0.2).collect();

        let jitter = (rng.gen::<f64>() - 0.5) * 0.05;
        let consciousness_level = (profile.consciousness_baseline + jitter).clamp(0.0, 1.0);
        let information_density = (profile.information_baseline + jitter).clamp(0.0, 1.0);
        let quantum_coherence = (profile.coherence_baseline + jitter).clamp(0.0, 1.0);

        Self {
            id: format!("reality_{}", index),
            reality_type,
            node_states,
            consciousness_level,
            information_density,
            quantum_coherence,
            last_change: 0.0,
            rng,
        }
    }

    /// Advance the node population one cycle, then recompute the derived
    /// scalars from the new node statistics.
    ///
    /// The local rule: each node mixes toward the mean of its ring neighbors,
    /// picks up per-type noise and an optional external bias, and is clamped
    /// to ±[`NODE_BOUND`]. The caller guarantees any bias slice is finite.
    pub fn step(&mut self, bias: Option<&[f64]>) {
        let n = self.node_states.len();
        let profile = self.reality_type.profile();

        let mut next = Vec::with_capacity(n);
        for i in 0..n {
            let left = self.node_states[(i + n - 1) % n];
            let right = self.node_states[(i + 1) % n];
            let neighbor_mean = (left + right) / 2.0;
            let noise = profile.noise_scale * (self.rng.gen::<f64>() * 2.0 - 1.0);
            let mut value = (1.0 - DIFFUSION_MIX) * self.node_states[i]
                + DIFFUSION_MIX * neighbor_mean
                + noise;
            if let Some(bias) = bias {
                if i < bias.len() {
                    value += bias[i];
                }
            }
            next.push(value.clamp(-NODE_BOUND, NODE_BOUND));
        }

        let mut change = 0.0;
        for (new, old) in next.iter().zip(self.node_states.iter()) {
            change += (new - old).abs();
        }
        self.last_change = if n > 0 { change / n as f64 } else { 0.0 };
        self.node_states = next;

        self.update_metrics();
    }

    /// Recompute consciousness, information density and coherence from node
    /// statistics (mean, variance, lag-1 correlation), relaxing toward the
    /// per-cycle targets at the adaptation rate.
    fn update_metrics(&mut self) {
        let n = self.node_states.len();
        if n == 0 {
            return;
        }
        let profile = self.reality_type.profile();

        let mean: f64 = self.node_states.iter().sum::<f64>() / n as f64;
        let variance: f64 =
            self.node_states.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
        let mean_abs: f64 = self.node_states.iter().map(|s| s.abs()).sum::<f64>() / n as f64;

        // Tight populations read as coherent; variance of 0 gives 1.
        let coherence_proxy = 1.0 / (1.0 + variance.sqrt());

        let shifted: Vec<f64> = (0..n).map(|i| self.node_states[(i + 1) % n]).collect();
        let lag_corr = pearson_correlation(&self.node_states, &shifted).abs();

        let c_target = 0.7 * coherence_proxy + 0.3 * profile.consciousness_baseline;
        let i_target = 0.5 * profile.information_baseline + 0.5 * (mean_abs / NODE_BOUND);
        let q_target = 0.5 * profile.coherence_baseline + 0.5 * lag_corr;

        self.consciousness_level = relax(self.consciousness_level, c_target);
        self.information_density = relax(self.information_density, i_target);
        self.quantum_coherence = relax(self.quantum_coherence, q_target);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn reality_type(&self) -> RealityType {
        self.reality_type
    }

    pub fn node_states(&self) -> &[f64] {
        &self.node_states
    }

    /// In [0, 1].
    pub fn consciousness_level(&self) -> f64 {
        self.consciousness_level
    }

    /// In [0, 1].
    pub fn information_density(&self) -> f64 {
        self.information_density
    }

    /// In [0, 1].
    pub fn quantum_coherence(&self) -> f64 {
        self.quantum_coherence
    }

    /// Mean absolute node change over the most recent cycle.
    pub fn last_change(&self) -> f64 {
        self.last_change
    }
}

fn relax(current: f64, target: f64) -> f64 {
    ((1.0 - ADAPTATION) * current + ADAPTATION * target).clamp(0.0, 1.0)
}

/// Pearson correlation between two equal-length samples, in [-1, 1].
/// Returns 0 when either sample has zero variance or the lengths differ.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let n = a.len() as f64;
    let mean_a: f64 = a.iter().sum::<f64>() / n;
    let mean_b: f64 = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }
    (cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_type_assignment() {
        assert_eq!(RealityType::from_index(0), RealityType::Individual);
        assert_eq!(RealityType::from_index(7), RealityType::Absolute);
        assert_eq!(RealityType::from_index(8), RealityType::Individual);
        assert_eq!(RealityType::from_index(13), RealityType::Universal);
    }

    #[test]
    fn type_profiles_are_distinct() {
        // Explicit design requirement: each type must carry its own baseline
        // so steady-state behavior differs between types.
        for (i, a) in RealityType::ALL.iter().enumerate() {
            for b in RealityType::ALL.iter().skip(i + 1) {
                assert_ne!(
                    a.profile(),
                    b.profile(),
                    "{} and {} share a profile",
                    a.label(),
                    b.label()
                );
            }
        }
    }

    #[test]
    fn baselines_lie_in_unit_interval() {
        for t in RealityType::ALL {
            let p = t.profile();
            for v in [
                p.consciousness_baseline,
                p.coherence_baseline,
                p.information_baseline,
            ] {
                assert!((0.0..=1.0).contains(&v), "{} baseline {} out of range", t.label(), v);
            }
            assert!(p.noise_scale > 0.0);
        }
    }

    #[test]
    fn new_instance_has_small_node_states_and_baseline_metrics() {
        let inst = RealityInstance::new(3, 50, 42);
        assert_eq!(inst.node_states().len(), 50);
        assert_eq!(inst.reality_type(), RealityType::Solar);
        for &s in inst.node_states() {
            assert!(s.abs() <= 0.1 + 1e-12);
        }
        let base = RealityType::Solar.profile().consciousness_baseline;
        assert!((inst.consciousness_level() - base).abs() < 0.05);
    }

    #[test]
    fn nodes_stay_bounded_and_metrics_stay_in_range() {
        let mut inst = RealityInstance::new(0, 30, 7);
        let strong_bias = vec![3.0; 30];
        for cycle in 0..500 {
            let bias = if cycle % 2 == 0 {
                Some(strong_bias.as_slice())
            } else {
                None
            };
            inst.step(bias);
            for &s in inst.node_states() {
                assert!(s.abs() <= NODE_BOUND, "node {} escaped the bound", s);
            }
            for v in [
                inst.consciousness_level(),
                inst.information_density(),
                inst.quantum_coherence(),
            ] {
                assert!((0.0..=1.0).contains(&v), "metric {} out of [0,1]", v);
            }
        }
    }

    #[test]
    fn stepping_reports_nonzero_change() {
        let mut inst = RealityInstance::new(1, 40, 11);
        inst.step(None);
        assert!(inst.last_change() > 0.0);
    }

    #[test]
    fn same_seed_and_index_reproduce_exactly() {
        let mut a = RealityInstance::new(2, 25, 1234);
        let mut b = RealityInstance::new(2, 25, 1234);
        for _ in 0..100 {
            a.step(None);
            b.step(None);
        }
        assert_eq!(a.node_states(), b.node_states());
        assert_eq!(a.consciousness_level(), b.consciousness_level());
    }

    #[test]
    fn different_indices_get_different_streams() {
        let mut a = RealityInstance::new(0, 25, 99);
        let mut b = RealityInstance::new(8, 25, 99); // same type, different index
        assert_eq!(a.reality_type(), b.reality_type());
        a.step(None);
        b.step(None);
        assert_ne!(a.node_states(), b.node_states());
    }

    #[test]
    fn pearson_of_identical_samples_is_one() {
        let a = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson_correlation(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_anticorrelated_samples_is_minus_one() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [4.0, 3.0, 2.0, 1.0];
        assert!((pearson_correlation(&a, &b) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_constant_sample_is_zero() {
        let a = [2.0, 2.0, 2.0];
        let b = [1.0, 5.0, 9.0];
        assert_eq!(pearson_correlation(&a, &b), 0.0);
    }
}
