//! Circuit generations: arena-owned nodes, resistors and one power
//! supply.
//!
//! A [`Circuit`] is immutable once built, except for the mutations the
//! reducer and solver apply: removing a combined pair, inserting the
//! synthesized resistor, and attaching solved values. `Clone` is the
//! deep copy; both arenas hold plain values, so a cloned generation
//! shares nothing with its parent.

use std::fmt;
use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::element::{ElementRef, PowerSupply, Resistor, ResistorId};
use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::replacement::Replacement;

/// Identifier of a circuit generation within a reduction chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CircuitId(pub(crate) u32);

impl CircuitId {
    /// Create a new CircuitId from a raw value.
    pub fn new(id: u32) -> Self {
        CircuitId(id)
    }

    /// Position of this generation in its chain.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// One generation of a resistive network.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Circuit title, carried from the builder.
    title: Option<String>,
    /// Reduction depth: 0 for the root, +1 per combination step.
    depth: usize,
    /// Chain index of the generation this one was reduced from.
    parent: Option<CircuitId>,
    /// Map from node ID to node data.
    nodes: IndexMap<NodeId, Node>,
    /// Map from resistor ID to resistor data.
    resistors: IndexMap<ResistorId, Resistor>,
    /// The circuit's single power supply.
    supply: PowerSupply,
    /// Next available node ID.
    next_node_id: u32,
    /// Next available resistor ID, carried through every generation.
    next_resistor_id: u32,
}

impl Circuit {
    /// Start building a circuit.
    pub fn builder() -> CircuitBuilder {
        CircuitBuilder::new()
    }

    /// Get the circuit title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Reduction depth: 0 for the root network.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Chain index of the generation this one was reduced from.
    pub fn parent(&self) -> Option<CircuitId> {
        self.parent
    }

    /// Link this generation to its parent. Set by the reduction chain.
    pub fn set_parent(&mut self, parent: CircuitId) {
        self.parent = Some(parent);
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a node by ID, mutably. Used by the solver to label voltages.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Check if a node exists.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get a resistor by ID.
    pub fn resistor(&self, id: ResistorId) -> Option<&Resistor> {
        self.resistors.get(&id)
    }

    /// Get a resistor by ID, mutably. Used by the solver to attach
    /// solved values.
    pub fn resistor_mut(&mut self, id: ResistorId) -> Option<&mut Resistor> {
        self.resistors.get_mut(&id)
    }

    /// Iterate over all resistors in insertion order.
    ///
    /// This order is the deterministic scan order for pair detection.
    pub fn resistors(&self) -> impl Iterator<Item = &Resistor> {
        self.resistors.values()
    }

    /// Get the number of resistors.
    pub fn num_resistors(&self) -> usize {
        self.resistors.len()
    }

    /// Check if a resistor exists.
    pub fn has_resistor(&self, id: ResistorId) -> bool {
        self.resistors.contains_key(&id)
    }

    /// Get the power supply.
    pub fn supply(&self) -> &PowerSupply {
        &self.supply
    }

    /// A trivial circuit has at most one resistor left.
    pub fn is_trivial(&self) -> bool {
        self.num_resistors() <= 1
    }

    /// The single remaining resistor of a trivial circuit.
    pub fn sole_resistor(&self) -> Option<&Resistor> {
        if self.num_resistors() == 1 {
            self.resistors.values().next()
        } else {
            None
        }
    }

    /// Start the next generation: an identical copy, one level deeper,
    /// not yet linked to a chain.
    pub fn child(&self) -> Circuit {
        let mut child = self.clone();
        child.depth = self.depth + 1;
        child.parent = None;
        child
    }

    /// Remove a resistor, stripping it from its endpoint nodes'
    /// attachment lists.
    pub fn remove_resistor(&mut self, id: ResistorId) -> Result<Resistor> {
        let resistor = self
            .resistors
            .shift_remove(&id)
            .ok_or(Error::ResistorNotFound(id))?;
        for end in resistor.nodes() {
            if let Some(node) = self.nodes.get_mut(&end) {
                node.detach(ElementRef::Resistor(id));
            }
        }
        Ok(resistor)
    }

    /// Retire a node. The node must have no attached elements left.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        match self.nodes.get(&id) {
            None => return Err(Error::NodeNotFound(id)),
            Some(node) if node.degree() > 0 => {
                return Err(Error::NodeAttached {
                    node: id,
                    degree: node.degree(),
                });
            }
            Some(_) => {}
        }
        Ok(self
            .nodes
            .shift_remove(&id)
            .expect("presence checked above"))
    }

    /// Insert a resistor synthesized by a reduction step, allocating a
    /// chain-fresh id and attaching it to its endpoint nodes.
    pub fn insert_synthesized(
        &mut self,
        resistance: f64,
        node_pos: NodeId,
        node_neg: NodeId,
        replacement: Replacement,
    ) -> Result<ResistorId> {
        let id = ResistorId(self.next_resistor_id);
        let name = format!("R{}", self.next_resistor_id + 1);
        for end in [node_pos, node_neg] {
            if !self.nodes.contains_key(&end) {
                return Err(Error::UnknownNode {
                    node: end,
                    element: name.clone(),
                });
            }
        }
        self.next_resistor_id += 1;

        let resistor =
            Resistor::new(id, name, node_pos, node_neg, resistance).with_replacement(replacement);
        for end in [node_pos, node_neg] {
            if let Some(node) = self.nodes.get_mut(&end) {
                node.attach(ElementRef::Resistor(id));
            }
        }
        self.resistors.insert(id, resistor);
        Ok(id)
    }

    /// Check the node/resistor cross-references.
    ///
    /// Every resistor endpoint must be a member of the node set and
    /// appear in that node's attachment list; every attachment must
    /// reference the supply or an existing resistor that touches the
    /// node. Construction establishes this invariant and the reducer's
    /// mutations preserve it.
    pub fn validate(&self) -> Result<()> {
        for resistor in self.resistors.values() {
            for end in resistor.nodes() {
                let node = self.nodes.get(&end).ok_or_else(|| Error::UnknownNode {
                    node: end,
                    element: resistor.name().to_string(),
                })?;
                let attached = ElementRef::Resistor(resistor.id());
                if !node.connections().contains(&attached) {
                    return Err(Error::InvalidCircuit(format!(
                        "{} not attached to its endpoint {}",
                        resistor.name(),
                        end
                    )));
                }
            }
        }
        for node in self.nodes.values() {
            for element in node.connections() {
                let touches = match element {
                    ElementRef::Resistor(id) => self
                        .resistors
                        .get(id)
                        .is_some_and(|r| r.touches(node.id())),
                    ElementRef::Supply => self.supply.touches(node.id()),
                };
                if !touches {
                    return Err(Error::InvalidCircuit(format!(
                        "node {} lists {} which does not touch it",
                        node.id(),
                        element
                    )));
                }
            }
        }
        for end in [self.supply.node_pos(), self.supply.node_neg()] {
            if !self.nodes.contains_key(&end) {
                return Err(Error::UnknownNode {
                    node: end,
                    element: self.supply.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Compact human-readable listing of the generation.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let title = self.title.as_deref().unwrap_or("circuit");
        let _ = writeln!(out, "{} (depth {})", title, self.depth);
        for node in self.nodes.values() {
            let volts = match node.voltage() {
                Some(v) => format!("{v:.4} V"),
                None => "?".to_string(),
            };
            let connections: Vec<String> =
                node.connections().iter().map(ElementRef::to_string).collect();
            let _ = writeln!(
                out,
                "  node {:<6} {:<10} [{}]",
                node.label(),
                volts,
                connections.join(", ")
            );
        }
        for r in self.resistors.values() {
            let solved = match r.solved() {
                Some(op) => format!(
                    "{:.4} A  {:.4} V  {:.4} W",
                    op.amps, op.voltage_drop, op.watts
                ),
                None => "unsolved".to_string(),
            };
            let _ = writeln!(
                out,
                "  {:<6} {:>10.3} ohm  {} - {}  {}",
                r.name(),
                r.resistance(),
                r.node_pos(),
                r.node_neg(),
                solved
            );
        }
        let _ = writeln!(
            out,
            "  {:<6} {:>10.3} V    {} - {}",
            self.supply.name(),
            self.supply.voltage(),
            self.supply.node_pos(),
            self.supply.node_neg()
        );
        out
    }
}

/// Builder for the root [`Circuit`].
///
/// Wiring is recorded incrementally; malformed networks are rejected
/// here, before reduction ever sees them. Elements are attached to
/// their endpoint nodes automatically.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    title: Option<String>,
    nodes: IndexMap<NodeId, Node>,
    resistors: IndexMap<ResistorId, Resistor>,
    supply: Option<PowerSupply>,
    next_node_id: u32,
    next_resistor_id: u32,
}

impl CircuitBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder with a circuit title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Add a node, returning its ID.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, Node::new(id));
        id
    }

    /// Add a named node, returning its ID.
    pub fn add_named_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, Node::with_name(id, name));
        id
    }

    /// Add a resistor between two nodes, returning its ID. The name is
    /// generated from the id counter.
    pub fn add_resistor(
        &mut self,
        node_pos: NodeId,
        node_neg: NodeId,
        ohms: f64,
    ) -> Result<ResistorId> {
        let name = format!("R{}", self.next_resistor_id + 1);
        self.add_named_resistor(name, node_pos, node_neg, ohms)
    }

    /// Add a named resistor between two nodes, returning its ID.
    pub fn add_named_resistor(
        &mut self,
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        ohms: f64,
    ) -> Result<ResistorId> {
        let name = name.into();
        if !(ohms.is_finite() && ohms > 0.0) {
            return Err(Error::InvalidResistance { name, ohms });
        }
        if node_pos == node_neg {
            return Err(Error::SelfLoop {
                name,
                node: node_pos,
            });
        }
        for end in [node_pos, node_neg] {
            if !self.nodes.contains_key(&end) {
                return Err(Error::UnknownNode {
                    node: end,
                    element: name.clone(),
                });
            }
        }

        let id = ResistorId(self.next_resistor_id);
        self.next_resistor_id += 1;
        self.resistors
            .insert(id, Resistor::new(id, name, node_pos, node_neg, ohms));
        for end in [node_pos, node_neg] {
            if let Some(node) = self.nodes.get_mut(&end) {
                node.attach(ElementRef::Resistor(id));
            }
        }
        Ok(id)
    }

    /// Set the power supply. A circuit has exactly one.
    pub fn supply(&mut self, volts: f64, node_pos: NodeId, node_neg: NodeId) -> Result<()> {
        if let Some(existing) = &self.supply {
            return Err(Error::DuplicateSupply(existing.name().to_string()));
        }
        let name = "V1".to_string();
        if !volts.is_finite() {
            return Err(Error::InvalidVoltage { name, volts });
        }
        for end in [node_pos, node_neg] {
            if !self.nodes.contains_key(&end) {
                return Err(Error::UnknownNode {
                    node: end,
                    element: name.clone(),
                });
            }
        }
        for end in [node_pos, node_neg] {
            if let Some(node) = self.nodes.get_mut(&end) {
                node.attach(ElementRef::Supply);
            }
        }
        self.supply = Some(PowerSupply::new(name, volts, node_pos, node_neg));
        Ok(())
    }

    /// Finish construction, validating the wiring.
    pub fn build(self) -> Result<Circuit> {
        let supply = self.supply.ok_or(Error::MissingSupply)?;
        if self.resistors.is_empty() {
            return Err(Error::NoResistors);
        }
        for node in self.nodes.values() {
            if node.degree() == 0 {
                return Err(Error::DanglingNode(node.label()));
            }
        }

        let circuit = Circuit {
            title: self.title,
            depth: 0,
            parent: None,
            nodes: self.nodes,
            resistors: self.resistors,
            supply,
            next_node_id: self.next_node_id,
            next_resistor_id: self.next_resistor_id,
        };
        circuit.validate()?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn divider() -> Circuit {
        let mut b = CircuitBuilder::with_title("divider");
        let n1 = b.add_node();
        let n2 = b.add_node();
        let n3 = b.add_node();
        b.add_resistor(n1, n2, 100.0).unwrap();
        b.add_resistor(n2, n3, 200.0).unwrap();
        b.supply(10.0, n1, n3).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_build_wires_attachments() {
        let circuit = divider();
        assert_eq!(circuit.num_nodes(), 3);
        assert_eq!(circuit.num_resistors(), 2);
        assert_eq!(circuit.depth(), 0);
        assert!(circuit.parent().is_none());

        // middle node carries both resistors, terminals carry supply too
        let n2 = circuit.node(NodeId::new(1)).unwrap();
        assert_eq!(n2.degree(), 2);
        let n1 = circuit.node(NodeId::new(0)).unwrap();
        assert_eq!(n1.degree(), 2);
        assert!(n1.connections().contains(&ElementRef::Supply));

        circuit.validate().unwrap();
    }

    #[test]
    fn test_missing_supply_rejected() {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        let n2 = b.add_node();
        b.add_resistor(n1, n2, 100.0).unwrap();
        assert!(matches!(b.build(), Err(Error::MissingSupply)));
    }

    #[test]
    fn test_duplicate_supply_rejected() {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        let n2 = b.add_node();
        b.add_resistor(n1, n2, 100.0).unwrap();
        b.supply(10.0, n1, n2).unwrap();
        assert!(matches!(
            b.supply(5.0, n1, n2),
            Err(Error::DuplicateSupply(_))
        ));
    }

    #[test]
    fn test_no_resistors_rejected() {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        let n2 = b.add_node();
        b.supply(10.0, n1, n2).unwrap();
        assert!(matches!(b.build(), Err(Error::NoResistors)));
    }

    #[test]
    fn test_bad_resistance_rejected() {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        let n2 = b.add_node();
        assert!(matches!(
            b.add_resistor(n1, n2, 0.0),
            Err(Error::InvalidResistance { .. })
        ));
        assert!(matches!(
            b.add_resistor(n1, n2, -5.0),
            Err(Error::InvalidResistance { .. })
        ));
        assert!(matches!(
            b.add_resistor(n1, n2, f64::NAN),
            Err(Error::InvalidResistance { .. })
        ));
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        assert!(matches!(
            b.add_resistor(n1, n1, 100.0),
            Err(Error::SelfLoop { .. })
        ));
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        assert!(matches!(
            b.add_resistor(n1, NodeId::new(99), 100.0),
            Err(Error::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_dangling_node_rejected() {
        let mut b = CircuitBuilder::new();
        let n1 = b.add_node();
        let n2 = b.add_node();
        b.add_node(); // never wired
        b.add_resistor(n1, n2, 100.0).unwrap();
        b.supply(10.0, n1, n2).unwrap();
        assert!(matches!(b.build(), Err(Error::DanglingNode(_))));
    }

    #[test]
    fn test_child_is_deep_copy() {
        let circuit = divider();
        let mut child = circuit.child();
        assert_eq!(child.depth(), 1);
        assert!(child.parent().is_none());

        // mutating the child never perturbs the parent
        let id = ResistorId::new(0);
        child.remove_resistor(id).unwrap();
        assert!(!child.has_resistor(id));
        assert!(circuit.has_resistor(id));
        assert_eq!(circuit.node(NodeId::new(0)).unwrap().degree(), 2);
        assert_eq!(child.node(NodeId::new(0)).unwrap().degree(), 1);
    }

    #[test]
    fn test_remove_node_requires_detached() {
        let mut circuit = divider();
        let n2 = NodeId::new(1);
        assert!(matches!(
            circuit.remove_node(n2),
            Err(Error::NodeAttached { .. })
        ));

        circuit.remove_resistor(ResistorId::new(0)).unwrap();
        circuit.remove_resistor(ResistorId::new(1)).unwrap();
        circuit.remove_node(n2).unwrap();
        assert!(!circuit.has_node(n2));
    }

    #[test]
    fn test_insert_synthesized_allocates_fresh_id() {
        let mut child = divider().child();
        child.remove_resistor(ResistorId::new(0)).unwrap();
        child.remove_resistor(ResistorId::new(1)).unwrap();
        child.remove_node(NodeId::new(1)).unwrap();

        let rep = Replacement::series(ResistorId::new(0), ResistorId::new(1), NodeId::new(1));
        let id = child
            .insert_synthesized(300.0, NodeId::new(0), NodeId::new(2), rep)
            .unwrap();
        assert_eq!(id, ResistorId::new(2));

        let r = child.resistor(id).unwrap();
        assert_eq!(r.resistance(), 300.0);
        assert_eq!(
            r.replacement().unwrap().kind,
            crate::replacement::ReplacementKind::Series
        );
        assert_eq!(child.node(NodeId::new(0)).unwrap().degree(), 2);
        child.validate().unwrap();
    }

    #[test]
    fn test_summary_lists_everything() {
        let circuit = divider();
        let summary = circuit.summary();
        assert!(summary.contains("divider"));
        assert!(summary.contains("R1"));
        assert!(summary.contains("R2"));
        assert!(summary.contains("V1"));
    }
}
