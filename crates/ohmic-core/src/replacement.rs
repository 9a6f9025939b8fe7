//! Provenance records linking synthesized resistors to the pair they
//! replace.

use std::fmt;

use crate::element::ResistorId;
use crate::node::NodeId;

/// How a synthesized resistor combined its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementKind {
    /// End-to-end through a shared ordinary node; resistances add.
    Series,
    /// Side-by-side across the same two nodes; conductances add.
    Parallel,
}

impl fmt::Display for ReplacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementKind::Series => write!(f, "series"),
            ReplacementKind::Parallel => write!(f, "parallel"),
        }
    }
}

/// Record of the pair a synthesized resistor stands in for.
///
/// Created exactly once, when the owning resistor is synthesized, and
/// immutable thereafter. The ids reference the parent generation's
/// arenas. `node` is the junction retired by a series merge; parallel
/// merges retire no node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    /// First combined resistor.
    pub a: ResistorId,
    /// Second combined resistor.
    pub b: ResistorId,
    /// Junction eliminated by a series merge.
    pub node: Option<NodeId>,
    /// Combination kind.
    pub kind: ReplacementKind,
}

impl Replacement {
    /// Provenance of a series merge, retiring the shared `node`.
    pub fn series(a: ResistorId, b: ResistorId, node: NodeId) -> Self {
        Self {
            a,
            b,
            node: Some(node),
            kind: ReplacementKind::Series,
        }
    }

    /// Provenance of a parallel merge.
    pub fn parallel(a: ResistorId, b: ResistorId) -> Self {
        Self {
            a,
            b,
            node: None,
            kind: ReplacementKind::Parallel,
        }
    }
}
