//! Node representation for circuit graphs.

use std::fmt;

use crate::element::ElementRef;

/// Unique identifier for a node within one circuit generation.
///
/// Node ids are arena indices. A reduced generation copies its parent's
/// arenas, so the same id names the same junction in every generation
/// that still contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Create a new NodeId from a raw value.
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// Get the raw node ID value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A junction in the circuit graph.
///
/// A node records the elements attached to it and, once the solver has
/// run, its voltage. A node with more than two attached elements is
/// *extraordinary*; only ordinary nodes may be the shared junction of a
/// series pair, and only extraordinary nodes may terminate a parallel
/// pair.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,
    /// Optional name for the node (from the builder).
    name: Option<String>,
    /// Solved voltage, unknown until the solver labels it.
    voltage: Option<f64>,
    /// Elements incident on this node.
    connections: Vec<ElementRef>,
}

impl Node {
    /// Create a new unconnected node with the given ID.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            name: None,
            voltage: None,
            connections: Vec::new(),
        }
    }

    /// Create a new unconnected node with the given ID and name.
    pub fn with_name(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            voltage: None,
            connections: Vec::new(),
        }
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the node's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display label: the name when present, otherwise the id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }

    /// Solved voltage, or `None` until the solver labels this node.
    pub fn voltage(&self) -> Option<f64> {
        self.voltage
    }

    /// Label the node with its solved voltage. Write-once: the first
    /// value sticks.
    pub fn set_voltage(&mut self, volts: f64) {
        self.voltage.get_or_insert(volts);
    }

    /// Record an incident element.
    pub fn attach(&mut self, element: ElementRef) {
        self.connections.push(element);
    }

    /// Remove one incident element by identity. No-op if absent.
    pub fn detach(&mut self, element: ElementRef) {
        if let Some(pos) = self.connections.iter().position(|e| *e == element) {
            self.connections.remove(pos);
        }
    }

    /// Elements incident on this node.
    pub fn connections(&self) -> &[ElementRef] {
        &self.connections
    }

    /// Number of attached elements.
    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    /// An extraordinary node has more than two attached elements.
    pub fn is_extraordinary(&self) -> bool {
        self.degree() > 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ResistorId;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(3).to_string(), "n3");
        assert_eq!(NodeId::new(3).as_u32(), 3);
    }

    #[test]
    fn test_attach_detach() {
        let mut node = Node::new(NodeId::new(0));
        let r0 = ElementRef::Resistor(ResistorId::new(0));
        let r1 = ElementRef::Resistor(ResistorId::new(1));

        node.attach(r0);
        node.attach(r1);
        assert_eq!(node.degree(), 2);

        node.detach(r0);
        assert_eq!(node.degree(), 1);
        assert_eq!(node.connections(), &[r1]);

        // detaching an absent element is a no-op
        node.detach(r0);
        assert_eq!(node.degree(), 1);
    }

    #[test]
    fn test_extraordinary_threshold() {
        let mut node = Node::new(NodeId::new(0));
        node.attach(ElementRef::Supply);
        node.attach(ElementRef::Resistor(ResistorId::new(0)));
        assert!(!node.is_extraordinary());

        node.attach(ElementRef::Resistor(ResistorId::new(1)));
        assert!(node.is_extraordinary());
    }

    #[test]
    fn test_voltage_write_once() {
        let mut node = Node::new(NodeId::new(0));
        assert_eq!(node.voltage(), None);

        node.set_voltage(5.0);
        node.set_voltage(7.0);
        assert_eq!(node.voltage(), Some(5.0));
    }

    #[test]
    fn test_node_label() {
        let named = Node::with_name(NodeId::new(1), "vdd");
        assert_eq!(named.label(), "vdd");

        let anonymous = Node::new(NodeId::new(2));
        assert_eq!(anonymous.label(), "n2");
    }
}
