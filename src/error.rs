//! Error taxonomy for the simulation engines.
//!
//! Two failure classes exist: configurations rejected at construction time
//! and non-finite numeric inputs rejected per call. A rejected call never
//! mutates prior state (validate-then-mutate ordering throughout the crate).

use std::error::Error;
use std::fmt;

/// Errors produced by cell and network operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A construction-time parameter violated its invariant
    /// (non-positive dt or time constant, threshold at or below resting,
    /// zero instances or nodes). Fatal to that construction call.
    InvalidConfiguration(String),

    /// A per-call numeric input was NaN or infinite. The offending call is
    /// rejected; state from prior calls is untouched.
    InvalidInput(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            SimError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
        }
    }
}

impl Error for SimError {}
