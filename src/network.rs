//! Multi-instance network evolution engine.
//!
//! Owns N independent [`RealityInstance`]s and advances them in a strict
//! barrier-per-cycle pattern: parallel fan-out (each instance mutated
//! exclusively by its own worker, on rayon when the `parallel` feature is
//! enabled), then a single-threaded aggregation pass that computes the
//! cross-instance metrics and appends them to the evolution history.
//!
//! Results are identical between parallel and serial builds: every instance
//! owns its own seeded RNG and the aggregation always reads instances in
//! creation order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::SimError;
use crate::reality::{pearson_correlation, RealityInstance, RealityType};

/// Master seed used by [`MultiRealityNetwork::new`]; per-instance streams are
/// derived from it plus the instance index.
pub const DEFAULT_MASTER_SEED: u64 = 42;

/// Mean node change below which an instance does not count as an active
/// signal source.
const NOISE_FLOOR: f64 = 1e-4;

/// Per-cycle aggregate metric series, all four kept aligned.
#[derive(Debug, Clone, Default)]
pub struct EvolutionHistory {
    /// Weighted mean of per-instance consciousness, in [0, 1].
    pub global_consciousness: Vec<f64>,
    /// Mean pairwise |correlation| between instance node vectors, in [0, 1].
    pub cross_reality_coherence: Vec<f64>,
    /// 1 − normalized spread of per-instance consciousness, in [0, 1].
    pub reality_synchronization: Vec<f64>,
    /// Magnitude of aggregate change since the previous cycle, ≥ 0.
    pub information_flow_rate: Vec<f64>,
}

impl EvolutionHistory {
    /// Number of recorded cycles (all four series share this length).
    pub fn len(&self) -> usize {
        self.global_consciousness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global_consciousness.is_empty()
    }

    fn push(&mut self, aggregates: Aggregates, flow: f64) {
        self.global_consciousness.push(aggregates.consciousness);
        self.cross_reality_coherence.push(aggregates.coherence);
        self.reality_synchronization.push(aggregates.synchronization);
        self.information_flow_rate.push(flow);
    }
}

/// Read-only per-instance entry in a [`NetworkSnapshot`].
#[derive(Debug, Clone)]
pub struct InstanceSnapshot {
    pub id: String,
    pub reality_type: RealityType,
    pub consciousness_level: f64,
    pub information_density: f64,
    pub quantum_coherence: f64,
}

/// Read-only view of the network, taken at a cycle boundary. All data are
/// copies; mutating a snapshot never affects the engine.
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    pub num_instances: usize,
    pub total_nodes: usize,
    pub global_consciousness: f64,
    pub cross_reality_coherence: f64,
    pub reality_synchronization: f64,
    /// Instances whose node change last cycle exceeded the noise floor.
    pub active_signals: usize,
    /// Per-instance breakdown, in creation order.
    pub instances: Vec<InstanceSnapshot>,
}

#[derive(Debug, Clone, Copy)]
struct Aggregates {
    consciousness: f64,
    coherence: f64,
    synchronization: f64,
}

/// N independent reality instances plus their aggregate metric history.
#[derive(Debug, Clone)]
pub struct MultiRealityNetwork {
    instances: Vec<RealityInstance>,
    nodes_per_instance: usize,
    history: EvolutionHistory,
    current: Aggregates,
    information_flow_rate: f64,
    cycle: u64,
}

impl MultiRealityNetwork {
    /// Build a network with the default master seed.
    pub fn new(num_instances: usize, nodes_per_instance: usize) -> Result<Self, SimError> {
        Self::with_seed(num_instances, nodes_per_instance, DEFAULT_MASTER_SEED)
    }

    /// Build a network whose every random stream derives from `master_seed`.
    ///
    /// Fails with [`SimError::InvalidConfiguration`] if either size is zero.
    /// Types are assigned round-robin; node states start at small random
    /// values and per-instance metrics at their type baselines.
    pub fn with_seed(
        num_instances: usize,
        nodes_per_instance: usize,
        master_seed: u64,
    ) -> Result<Self, SimError> {
        if num_instances == 0 {
            return Err(SimError::InvalidConfiguration(
                "num_instances must be at least 1".into(),
            ));
        }
        if nodes_per_instance == 0 {
            return Err(SimError::InvalidConfiguration(
                "nodes_per_instance must be at least 1".into(),
            ));
        }

        let instances: Vec<RealityInstance> = (0..num_instances)
            .map(|i| RealityInstance::new(i, nodes_per_instance, master_seed))
            .collect();

        let current = compute_aggregates(&instances);
        Ok(Self {
            instances,
            nodes_per_instance,
            history: EvolutionHistory::default(),
            current,
            information_flow_rate: 0.0,
            cycle: 0,
        })
    }

    /// Evolve for `num_cycles` cycles, appending one history entry per cycle.
    ///
    /// A zero-cycle call appends exactly one baseline entry reflecting the
    /// current snapshot without advancing any instance, so every call leaves
    /// at least one entry behind and never errors.
    pub fn evolve(&mut self, num_cycles: usize) -> &EvolutionHistory {
        if num_cycles == 0 {
            self.history.push(self.current, self.information_flow_rate);
            return &self.history;
        }
        for _ in 0..num_cycles {
            self.run_cycle(None);
        }
        &self.history
    }

    /// Apply an external bias to every instance for exactly one cycle and
    /// return copies of the per-instance node states, in creation order.
    ///
    /// The bias is added node-wise (entries beyond the bias length are
    /// unbiased). Non-finite entries reject the call with
    /// [`SimError::InvalidInput`] before any instance is touched.
    pub fn process_computation(&mut self, inputs: &[f64]) -> Result<Vec<Vec<f64>>, SimError> {
        if let Some(pos) = inputs.iter().position(|i| !i.is_finite()) {
            return Err(SimError::InvalidInput(format!(
                "bias at index {} is not finite ({})",
                pos, inputs[pos]
            )));
        }
        self.run_cycle(Some(inputs));
        Ok(self
            .instances
            .iter()
            .map(|inst| inst.node_states().to_vec())
            .collect())
    }

    /// Pure read: current aggregates plus the per-instance breakdown.
    pub fn state(&self) -> NetworkSnapshot {
        let active_signals = self
            .instances
            .iter()
            .filter(|inst| inst.last_change() > NOISE_FLOOR)
            .count();
        NetworkSnapshot {
            num_instances: self.instances.len(),
            total_nodes: self.total_nodes(),
            global_consciousness: self.current.consciousness,
            cross_reality_coherence: self.current.coherence,
            reality_synchronization: self.current.synchronization,
            active_signals,
            instances: self
                .instances
                .iter()
                .map(|inst| InstanceSnapshot {
                    id: inst.id().to_string(),
                    reality_type: inst.reality_type(),
                    consciousness_level: inst.consciousness_level(),
                    information_density: inst.information_density(),
                    quantum_coherence: inst.quantum_coherence(),
                })
                .collect(),
        }
    }

    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    pub fn nodes_per_instance(&self) -> usize {
        self.nodes_per_instance
    }

    pub fn total_nodes(&self) -> usize {
        self.instances.len() * self.nodes_per_instance
    }

    /// Completed evolution cycles (baseline entries do not count).
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    pub fn instances(&self) -> &[RealityInstance] {
        &self.instances
    }

    /// One cycle: parallel fan-out over instances, then the single-threaded
    /// aggregation barrier.
    fn run_cycle(&mut self, bias: Option<&[f64]>) {
        #[cfg(feature = "parallel")]
        self.instances.par_iter_mut().for_each(|inst| inst.step(bias));
        #[cfg(not(feature = "parallel"))]
        for inst in &mut self.instances {
            inst.step(bias);
        }

        let next = compute_aggregates(&self.instances);
        let flow = aggregate_distance(self.current, next);
        self.current = next;
        self.information_flow_rate = flow;
        self.history.push(next, flow);
        self.cycle += 1;
    }
}

/// Cross-instance aggregate metrics, computed after the fan-in barrier.
fn compute_aggregates(instances: &[RealityInstance]) -> Aggregates {
    // Global consciousness: mean weighted by information density, so denser
    // instances count for more. Weighted mean of [0,1] values stays in [0,1].
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for inst in instances {
        let w = 1.0 + inst.information_density();
        weighted += w * inst.consciousness_level();
        weight_sum += w;
    }
    let consciousness = if weight_sum > 0.0 {
        weighted / weight_sum
    } else {
        0.0
    };

    // Cross-reality coherence: mean pairwise |Pearson| of node vectors. A
    // single instance is trivially coherent with itself.
    let n = instances.len();
    let coherence = if n < 2 {
        1.0
    } else {
        let mut sum = 0.0;
        let mut pairs = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                sum += pearson_correlation(
                    instances[i].node_states(),
                    instances[j].node_states(),
                )
                .abs();
                pairs += 1;
            }
        }
        sum / pairs as f64
    };

    // Synchronization: 1 − std of consciousness levels normalized by the
    // maximum possible spread of [0,1] values (0.5), clamped to [0,1].
    let mean: f64 =
        instances.iter().map(|i| i.consciousness_level()).sum::<f64>() / n.max(1) as f64;
    let variance: f64 = instances
        .iter()
        .map(|i| (i.consciousness_level() - mean).powi(2))
        .sum::<f64>()
        / n.max(1) as f64;
    let synchronization = (1.0 - variance.sqrt() / 0.5).clamp(0.0, 1.0);

    Aggregates {
        consciousness,
        coherence,
        synchronization,
    }
}

/// Euclidean distance between consecutive aggregate vectors; the
/// information-flow proxy.
fn aggregate_distance(a: Aggregates, b: Aggregates) -> f64 {
    let dc = b.consciousness - a.consciousness;
    let dh = b.coherence - a.coherence;
    let ds = b.synchronization - a.synchronization;
    (dc * dc + dh * dh + ds * ds).sqrt()
}
