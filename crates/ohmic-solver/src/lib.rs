//! Reduction and solving for ohmic.
//!
//! This crate provides:
//! - series/parallel pair detection and one-step combination
//! - the reduction chain of circuit generations
//! - the trivial-circuit solve and back-substitution that labels every
//!   resistor of the original network

pub mod chain;
pub mod error;
pub mod reduce;
pub mod solve;

pub use chain::ReductionChain;
pub use error::{Error, Result};
pub use reduce::{
    Pair, PairKind, combine, find_pair, find_parallel_pair, find_series_pair, reduce,
};
pub use solve::{Analysis, NetworkSolution, Phase, solve_network};
