//! Error types for ohmic-solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// More than one resistor remains but no series or parallel pair
    /// exists. The topology is outside the series/parallel class.
    #[error("no series or parallel pair at reduction depth {depth} ({resistors} resistors remain)")]
    UnreducibleTopology { depth: usize, resistors: usize },

    /// A reduction chain whose records disagree with its circuits.
    /// Indicates a bug in the combine step, not a recoverable condition.
    #[error("inconsistent reduction chain: {0}")]
    InternalConsistency(String),

    #[error(transparent)]
    Core(#[from] ohmic_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
