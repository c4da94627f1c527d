//! # quantum-spiking-sim
//!
//! Numeric simulation of quantum-classical hybrid spiking cells and
//! multi-instance "reality" networks.
//!
//! Two engines share this crate:
//!
//! - A [`cell::SpikingCell`]: a leaky integrate-and-fire membrane coupled to
//!   a two-amplitude [`coherence::CoherenceState`] whose off-diagonal term
//!   decays with T2. Coherence feeds back as stochastic tunneling kicks, the
//!   only source of sub-threshold firing. [`driver::run_cell`] drives a cell
//!   over an input sequence and collects traces and spike statistics.
//! - A [`network::MultiRealityNetwork`]: N independent
//!   [`reality::RealityInstance`] node populations advanced in a
//!   fan-out/barrier cycle, with cross-instance aggregate metrics appended to
//!   a rolling history each cycle.
//!
//! Every random draw comes from an explicit `StdRng` seeded at construction,
//! so identical configurations and seeds reproduce bit-identical traces and
//! histories. With the default `parallel` feature, per-instance updates run
//! on rayon workers; serial builds produce the same numbers.
//!
//! ## Usage
//!
//! ```
//! use quantum_spiking_sim::prelude::*;
//!
//! let mut cell = SpikingCell::new("cell_0", CellConfig::default(), 42)?;
//! let inputs = vec![20.0; 2000];
//! let run = run_cell(&mut cell, &inputs)?;
//! assert!(run.spike_count > 0);
//!
//! let mut net = MultiRealityNetwork::new(4, 20)?;
//! let history = net.evolve(10);
//! assert_eq!(history.len(), 10);
//! # Ok::<(), quantum_spiking_sim::SimError>(())
//! ```

pub mod cell;
pub mod coherence;
pub mod driver;
pub mod error;
pub mod network;
pub mod reality;

pub use error::SimError;

pub mod prelude {
    pub use crate::cell::{CellConfig, SpikingCell};
    pub use crate::coherence::CoherenceState;
    pub use crate::driver::{run_cell, CellRun};
    pub use crate::error::SimError;
    pub use crate::network::{
        EvolutionHistory, InstanceSnapshot, MultiRealityNetwork, NetworkSnapshot,
    };
    pub use crate::reality::{RealityInstance, RealityType, TypeProfile};
}
