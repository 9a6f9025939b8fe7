//! Trivial-circuit solve and back-substitution through the reduction
//! chain.
//!
//! Once reduction leaves a single resistor, its values follow directly
//! from the supply voltage. Back-substitution then walks the chain one
//! hop at a time, most-reduced generation first: surviving resistors
//! copy their values parent-ward, and each generation's synthesized
//! resistor splits its values onto the pair its replacement records.

use log::debug;
use ohmic_core::{
    Circuit, NodeId, OperatingPoint, Replacement, ReplacementKind, Resistor, ResistorId,
};

use crate::chain::ReductionChain;
use crate::error::{Error, Result};
use crate::reduce;

/// Pipeline state, advanced by [`Analysis::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// More than one resistor remains; combining pairs.
    Reducing,
    /// A single resistor remains; ready to solve.
    Trivial,
    /// The trivial generation is solved; ready to back-substitute.
    Solved,
    /// Every resistor of the original network is labeled. Terminal.
    BackSubstituted,
}

/// Driver for the reduce / solve / back-substitute pipeline.
#[derive(Debug)]
pub struct Analysis {
    chain: ReductionChain,
    phase: Phase,
}

impl Analysis {
    /// Start an analysis at the root network.
    pub fn new(root: Circuit) -> Self {
        let phase = if root.is_trivial() {
            Phase::Trivial
        } else {
            Phase::Reducing
        };
        Self {
            chain: ReductionChain::new(root),
            phase,
        }
    }

    /// Current pipeline state.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The chain of generations produced so far.
    pub fn chain(&self) -> &ReductionChain {
        &self.chain
    }

    /// Advance one transition: one combination step while reducing,
    /// then the solve, then the full back-substitution walk.
    pub fn step(&mut self) -> Result<Phase> {
        match self.phase {
            Phase::Reducing => {
                let tip = self.chain.tip();
                let pair = reduce::find_pair(tip).ok_or_else(|| Error::UnreducibleTopology {
                    depth: tip.depth(),
                    resistors: tip.num_resistors(),
                })?;
                let child = reduce::combine(tip, &pair)?;
                self.chain.push(child);
                if self.chain.tip().is_trivial() {
                    self.phase = Phase::Trivial;
                }
            }
            Phase::Trivial => {
                solve_trivial(self.chain.tip_mut())?;
                self.phase = Phase::Solved;
            }
            Phase::Solved => {
                back_substitute(&mut self.chain)?;
                self.phase = Phase::BackSubstituted;
            }
            Phase::BackSubstituted => {}
        }
        Ok(self.phase)
    }

    /// Run to completion.
    pub fn run(mut self) -> Result<NetworkSolution> {
        while self.phase != Phase::BackSubstituted {
            self.step()?;
        }
        Ok(NetworkSolution { chain: self.chain })
    }
}

/// Reduce, solve and back-substitute a network in one call.
pub fn solve_network(root: Circuit) -> Result<NetworkSolution> {
    Analysis::new(root).run()
}

/// Result of a completed pipeline run.
#[derive(Debug)]
pub struct NetworkSolution {
    chain: ReductionChain,
}

impl NetworkSolution {
    /// The original network, every resistor labeled.
    pub fn root(&self) -> &Circuit {
        self.chain.root()
    }

    /// The full chain of generations, root first.
    pub fn chain(&self) -> &ReductionChain {
        &self.chain
    }

    /// Number of combination steps performed.
    pub fn steps(&self) -> usize {
        self.chain.steps()
    }

    /// Resistance of the single equivalent resistor.
    pub fn equivalent_resistance(&self) -> f64 {
        self.trivial_resistor().resistance()
    }

    /// Current delivered by the supply.
    pub fn supply_current(&self) -> f64 {
        self.trivial_resistor()
            .amps()
            .expect("trivial resistor solved by the pipeline")
    }

    /// Total power dissipated across the original resistors.
    pub fn total_power(&self) -> f64 {
        self.root().resistors().filter_map(Resistor::watts).sum()
    }

    fn trivial_resistor(&self) -> &Resistor {
        self.chain
            .tip()
            .sole_resistor()
            .expect("solved chain ends in a trivial circuit")
    }
}

/// Solve the single-resistor circuit directly from the supply voltage.
fn solve_trivial(tip: &mut Circuit) -> Result<()> {
    let volts = tip.supply().voltage();
    let node_pos = tip.supply().node_pos();
    let node_neg = tip.supply().node_neg();

    let (id, resistance) = tip
        .sole_resistor()
        .map(|r| (r.id(), r.resistance()))
        .ok_or_else(|| {
            Error::InternalConsistency(format!(
                "trivial circuit holds {} resistors",
                tip.num_resistors()
            ))
        })?;

    // amps = V / R, drop = V, watts = drop * amps
    let op = OperatingPoint::from_voltage_drop(volts, resistance);
    if let Some(r) = tip.resistor_mut(id) {
        r.set_solved(op);
        debug!(
            "solved trivial circuit: {:.6} A through {}",
            op.amps,
            r.name()
        );
    }

    // negative terminal is the 0 V reference
    if let Some(node) = tip.node_mut(node_pos) {
        node.set_voltage(volts);
    }
    if let Some(node) = tip.node_mut(node_neg) {
        node.set_voltage(0.0);
    }
    Ok(())
}

/// Walk the chain tip-ward to root, applying one replacement hop at a
/// time.
fn back_substitute(chain: &mut ReductionChain) -> Result<()> {
    for k in (1..chain.len()).rev() {
        let (parent, child) = chain.parent_child(k);
        propagate_hop(parent, child)?;
    }
    debug!("back-substitution reached the root");
    Ok(())
}

/// Push one generation's values onto its parent.
fn propagate_hop(parent: &mut Circuit, child: &Circuit) -> Result<()> {
    // surviving nodes keep their voltages
    for node in child.nodes() {
        if let (Some(volts), Some(parent_node)) = (node.voltage(), parent.node_mut(node.id())) {
            parent_node.set_voltage(volts);
        }
    }

    for r in child.resistors() {
        let solved = *r.solved().ok_or_else(|| {
            Error::InternalConsistency(format!(
                "{} reached back-substitution unsolved",
                r.name()
            ))
        })?;

        // a resistor the parent also holds is a plain copy
        if let Some(parent_resistor) = parent.resistor_mut(r.id()) {
            parent_resistor.set_solved(solved);
            continue;
        }

        // otherwise it was synthesized for this generation: split its
        // values onto the pair it replaced
        let replacement = *r.replacement().ok_or_else(|| {
            Error::InternalConsistency(format!(
                "synthesized {} carries no replacement record",
                r.name()
            ))
        })?;
        split_replacement(parent, solved, &replacement)?;
    }
    Ok(())
}

fn member_resistance(parent: &Circuit, rep: &Replacement, id: ResistorId) -> Result<f64> {
    parent
        .resistor(id)
        .map(Resistor::resistance)
        .ok_or_else(|| {
            Error::InternalConsistency(format!(
                "{} replacement references {} absent from the parent generation",
                rep.kind, id
            ))
        })
}

/// Apply the series/parallel split rules of one replacement record.
fn split_replacement(
    parent: &mut Circuit,
    combined: OperatingPoint,
    rep: &Replacement,
) -> Result<()> {
    let resistance_a = member_resistance(parent, rep, rep.a)?;
    let resistance_b = member_resistance(parent, rep, rep.b)?;

    let (op_a, op_b) = match rep.kind {
        // series members carry the combined current
        ReplacementKind::Series => (
            OperatingPoint::from_amps(combined.amps, resistance_a),
            OperatingPoint::from_amps(combined.amps, resistance_b),
        ),
        // parallel members carry the combined drop
        ReplacementKind::Parallel => (
            OperatingPoint::from_voltage_drop(combined.voltage_drop, resistance_a),
            OperatingPoint::from_voltage_drop(combined.voltage_drop, resistance_b),
        ),
    };

    if let Some(r) = parent.resistor_mut(rep.a) {
        r.set_solved(op_a);
    }
    if let Some(r) = parent.resistor_mut(rep.b) {
        r.set_solved(op_b);
    }

    if rep.kind == ReplacementKind::Series {
        if let Some(junction) = rep.node {
            label_junction(parent, rep, junction, op_a);
        }
    }
    Ok(())
}

/// Derive the retired series junction's voltage from the outer
/// endpoint of member `a` and the drop across it. Current flows from
/// the higher outer potential toward the lower, so the junction sits
/// one drop below the higher side.
fn label_junction(
    parent: &mut Circuit,
    rep: &Replacement,
    junction: NodeId,
    op_a: OperatingPoint,
) {
    let outer = |id| {
        parent
            .resistor(id)
            .and_then(|r: &Resistor| r.other_end(junction))
    };
    let (Some(outer_a), Some(outer_b)) = (outer(rep.a), outer(rep.b)) else {
        return;
    };
    let volts_a = parent.node(outer_a).and_then(|n| n.voltage());
    let volts_b = parent.node(outer_b).and_then(|n| n.voltage());
    let (Some(volts_a), Some(volts_b)) = (volts_a, volts_b) else {
        return;
    };

    let drop_a = op_a.voltage_drop.abs();
    let junction_volts = if volts_a >= volts_b {
        volts_a - drop_a
    } else {
        volts_a + drop_a
    };
    if let Some(node) = parent.node_mut(junction) {
        node.set_voltage(junction_volts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohmic_core::CircuitBuilder;

    fn single(volts: f64, ohms: f64) -> Circuit {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        let n2 = b.add_node();
        b.add_resistor(n1, n2, ohms).unwrap();
        b.supply(volts, n1, n2).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_trivial_network_skips_reducing() {
        let analysis = Analysis::new(single(12.0, 48.0));
        assert_eq!(analysis.phase(), Phase::Trivial);

        let solution = analysis.run().unwrap();
        assert_eq!(solution.steps(), 0);

        let r = solution.root().sole_resistor().unwrap();
        assert!((r.amps().unwrap() - 0.25).abs() < 1e-12);
        assert!((r.voltage_drop().unwrap() - 12.0).abs() < 1e-12);
        assert!((r.watts().unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_phase_sequence() {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        let n2 = b.add_node();
        let n3 = b.add_node();
        b.add_resistor(n1, n2, 100.0).unwrap();
        b.add_resistor(n2, n3, 200.0).unwrap();
        b.supply(9.0, n1, n3).unwrap();
        let mut analysis = Analysis::new(b.build().unwrap());

        assert_eq!(analysis.phase(), Phase::Reducing);
        assert_eq!(analysis.step().unwrap(), Phase::Trivial);
        assert_eq!(analysis.step().unwrap(), Phase::Solved);
        assert_eq!(analysis.step().unwrap(), Phase::BackSubstituted);
        // terminal state is idempotent
        assert_eq!(analysis.step().unwrap(), Phase::BackSubstituted);
    }

    #[test]
    fn test_terminal_voltages_labeled() {
        let solution = solve_network(single(5.0, 100.0)).unwrap();
        let root = solution.root();
        let supply = root.supply();
        assert_eq!(
            root.node(supply.node_pos()).unwrap().voltage(),
            Some(5.0)
        );
        assert_eq!(root.node(supply.node_neg()).unwrap().voltage(), Some(0.0));
    }

    #[test]
    fn test_series_junction_voltage() {
        // 9 V across 100 + 200 in series: junction sits at 9 - 3 = 6 V
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        let n2 = b.add_node();
        let n3 = b.add_node();
        b.add_resistor(n1, n2, 100.0).unwrap();
        b.add_resistor(n2, n3, 200.0).unwrap();
        b.supply(9.0, n1, n3).unwrap();
        let solution = solve_network(b.build().unwrap()).unwrap();

        let junction = solution.root().node(n2).unwrap();
        assert!((junction.voltage().unwrap() - 6.0).abs() < 1e-9);
    }
}
