//! # Ohmic
//!
//! A series/parallel reducer for resistive DC networks.
//!
//! Ohmic collapses a network of resistors around a single supply one
//! series-or-parallel pair at a time, solves the resulting
//! single-resistor circuit, and back-substitutes through the chain of
//! generations until every original resistor carries its current,
//! voltage drop and power.
//!
//! ## Quick Start
//!
//! ```rust
//! use ohmic::prelude::*;
//!
//! // 12 V across R1 in series with the R2 || R3 bank
//! let mut b = CircuitBuilder::with_title("reference");
//! let n1 = b.add_node();
//! let n2 = b.add_node();
//! let n3 = b.add_node();
//! let r1 = b.add_resistor(n1, n2, 100.0).unwrap();
//! b.add_resistor(n2, n3, 50.0).unwrap();
//! b.add_resistor(n2, n3, 150.0).unwrap();
//! b.supply(12.0, n1, n3).unwrap();
//!
//! let solution = solve_network(b.build().unwrap()).unwrap();
//! assert!((solution.equivalent_resistance() - 137.5).abs() < 1e-12);
//!
//! let r1 = solution.root().resistor(r1).unwrap();
//! println!("I(R1) = {:.4} A", r1.amps().unwrap());
//! ```
//!
//! Networks that are not series/parallel reducible (bridges, multiple
//! meshes) fail with an explicit error rather than a wrong answer.

// Re-export core crates
pub use ohmic_core as core;
pub use ohmic_solver as solver;

// ============================================================================
// Convenient re-exports from ohmic_core
// ============================================================================

pub use ohmic_core::{
    // Circuit representation
    Circuit,
    CircuitBuilder,
    CircuitId,
    ElementRef,
    // Errors
    Error as CoreError,
    Node,
    NodeId,
    OperatingPoint,
    PowerSupply,
    Replacement,
    ReplacementKind,
    Resistor,
    ResistorId,
};

// ============================================================================
// Convenient re-exports from ohmic_solver
// ============================================================================

pub use ohmic_solver::{
    Analysis,
    // Errors
    Error as SolverError,
    NetworkSolution,
    Pair,
    PairKind,
    Phase,
    ReductionChain,
    combine,
    find_pair,
    find_parallel_pair,
    find_series_pair,
    // Reduction
    reduce,
    // Pipeline
    solve_network,
};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module containing commonly used types and functions.
///
/// ```rust
/// use ohmic::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::{Circuit, CircuitBuilder, Node, NodeId, OperatingPoint, Resistor, ResistorId};

    // Replacement records
    pub use crate::{Replacement, ReplacementKind};

    // Pipeline
    pub use crate::{Analysis, NetworkSolution, Phase, solve_network};

    // Reduction
    pub use crate::{Pair, PairKind, ReductionChain, find_pair, reduce};
}
