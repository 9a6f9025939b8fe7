//! Pair detection and combination: one series-or-parallel collapse per
//! step.
//!
//! Detection scans unordered resistor pairs in arena insertion order
//! (outer index ascending, inner ascending) and returns the first hit,
//! so a given network always reduces along the same trace. Series
//! detection runs first; parallel pairs are only consulted when no
//! series pair exists.

use log::{debug, trace};
use ohmic_core::{Circuit, NodeId, Replacement, Resistor, ResistorId};

use crate::chain::ReductionChain;
use crate::error::{Error, Result};

/// How a detected pair combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// The pair meets at one ordinary node, retired by the merge.
    Series {
        /// The shared junction.
        shared: NodeId,
    },
    /// The pair spans the same two extraordinary nodes.
    Parallel,
}

/// An unordered resistor pair eligible for combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    /// First member, earlier in scan order.
    pub a: ResistorId,
    /// Second member.
    pub b: ResistorId,
    /// Combination kind.
    pub kind: PairKind,
}

fn endpoints_extraordinary(circuit: &Circuit, r: &Resistor) -> bool {
    r.nodes()
        .iter()
        .all(|&n| circuit.node(n).is_some_and(|node| node.is_extraordinary()))
}

/// Find the first series pair: two resistors sharing exactly one node,
/// with that node ordinary (nothing else attached to it).
pub fn find_series_pair(circuit: &Circuit) -> Option<Pair> {
    let resistors: Vec<&Resistor> = circuit.resistors().collect();
    for (i, r1) in resistors.iter().enumerate() {
        for r2 in &resistors[i + 1..] {
            let Some(shared) = r1.common_node(r2) else {
                continue;
            };
            if circuit
                .node(shared)
                .is_some_and(|node| !node.is_extraordinary())
            {
                trace!("series pair {} + {} at {}", r1.name(), r2.name(), shared);
                return Some(Pair {
                    a: r1.id(),
                    b: r2.id(),
                    kind: PairKind::Series { shared },
                });
            }
        }
    }
    None
}

/// Find the first parallel pair: two resistors whose endpoint sets
/// coincide, with both endpoints extraordinary.
pub fn find_parallel_pair(circuit: &Circuit) -> Option<Pair> {
    let resistors: Vec<&Resistor> = circuit.resistors().collect();
    for (i, r1) in resistors.iter().enumerate() {
        // the pair spans the same two nodes, so checking one member's
        // endpoints covers both
        if !endpoints_extraordinary(circuit, r1) {
            continue;
        }
        for r2 in &resistors[i + 1..] {
            let aligned = r1.node_pos() == r2.node_pos() && r1.node_neg() == r2.node_neg();
            let crossed = r1.node_pos() == r2.node_neg() && r1.node_neg() == r2.node_pos();
            if aligned || crossed {
                trace!("parallel pair {} + {}", r1.name(), r2.name());
                return Some(Pair {
                    a: r1.id(),
                    b: r2.id(),
                    kind: PairKind::Parallel,
                });
            }
        }
    }
    None
}

/// Find the next combinable pair. Series detection takes priority.
pub fn find_pair(circuit: &Circuit) -> Option<Pair> {
    find_series_pair(circuit).or_else(|| find_parallel_pair(circuit))
}

/// Build the next generation by collapsing `pair` out of `parent`.
pub fn combine(parent: &Circuit, pair: &Pair) -> Result<Circuit> {
    let mut child = parent.child();
    let a = child.remove_resistor(pair.a)?;
    let b = child.remove_resistor(pair.b)?;

    let id = match pair.kind {
        PairKind::Series { shared } => {
            let (Some(end_a), Some(end_b)) = (a.uncommon_node(&b), b.uncommon_node(&a)) else {
                return Err(Error::InternalConsistency(format!(
                    "series pair {} + {} does not straddle {}",
                    a.name(),
                    b.name(),
                    shared
                )));
            };
            child.remove_node(shared)?;
            child.insert_synthesized(
                a.resistance() + b.resistance(),
                end_a,
                end_b,
                Replacement::series(pair.a, pair.b, shared),
            )?
        }
        PairKind::Parallel => {
            let resistance =
                a.resistance() * b.resistance() / (a.resistance() + b.resistance());
            child.insert_synthesized(
                resistance,
                a.node_pos(),
                a.node_neg(),
                Replacement::parallel(pair.a, pair.b),
            )?
        }
    };

    if let Some(r) = child.resistor(id) {
        let kind = match pair.kind {
            PairKind::Series { .. } => "series",
            PairKind::Parallel => "parallel",
        };
        debug!(
            "combined {} + {} ({}) -> {} ({} ohm), {} resistors remain",
            a.name(),
            b.name(),
            kind,
            r.name(),
            r.resistance(),
            child.num_resistors()
        );
    }
    Ok(child)
}

/// Reduce until at most one resistor remains.
///
/// A fully reducible K-resistor network takes exactly K-1 combination
/// steps. A network with more than one resistor and no combinable pair
/// is outside the series/parallel class and fails with
/// [`Error::UnreducibleTopology`].
pub fn reduce(root: Circuit) -> Result<ReductionChain> {
    let mut chain = ReductionChain::new(root);
    while chain.tip().num_resistors() > 1 {
        let tip = chain.tip();
        let pair = find_pair(tip).ok_or_else(|| Error::UnreducibleTopology {
            depth: tip.depth(),
            resistors: tip.num_resistors(),
        })?;
        let child = combine(tip, &pair)?;
        chain.push(child);
    }
    Ok(chain)
}
