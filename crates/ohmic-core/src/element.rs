//! Circuit elements: resistors and the power supply.

use std::fmt;

use crate::node::NodeId;
use crate::replacement::Replacement;

/// Unique identifier for a resistor.
///
/// Resistor ids are allocated from a counter carried through every
/// generation of a reduction chain, so an id synthesized at any step
/// never collides with one from an earlier generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResistorId(pub(crate) u32);

impl ResistorId {
    /// Create a new ResistorId from a raw value.
    pub fn new(id: u32) -> Self {
        ResistorId(id)
    }

    /// Get the raw resistor ID value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResistorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Identity of an element attached to a node.
///
/// Node attachment lists hold this closed sum rather than references,
/// keeping generations free of cross-copy aliasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef {
    /// A resistor, by id.
    Resistor(ResistorId),
    /// The circuit's single power supply.
    Supply,
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Resistor(id) => write!(f, "{id}"),
            ElementRef::Supply => write!(f, "supply"),
        }
    }
}

/// Solved electrical values for one resistor.
///
/// The three fields are always produced together; a resistor either has
/// a complete operating point or none at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// Current through the resistor (A).
    pub amps: f64,
    /// Voltage across the resistor (V).
    pub voltage_drop: f64,
    /// Power dissipated (W).
    pub watts: f64,
}

impl OperatingPoint {
    /// Operating point of a resistor with known current (series split).
    pub fn from_amps(amps: f64, resistance: f64) -> Self {
        let voltage_drop = amps * resistance;
        Self {
            amps,
            voltage_drop,
            watts: voltage_drop * amps,
        }
    }

    /// Operating point of a resistor with known drop (parallel split).
    pub fn from_voltage_drop(voltage_drop: f64, resistance: f64) -> Self {
        let amps = voltage_drop / resistance;
        Self {
            amps,
            voltage_drop,
            watts: voltage_drop * amps,
        }
    }
}

/// A resistor element.
#[derive(Debug, Clone)]
pub struct Resistor {
    /// Unique id within the reduction chain.
    id: ResistorId,
    /// Device name (e.g., "R1").
    name: String,
    /// First terminal node.
    node_pos: NodeId,
    /// Second terminal node.
    node_neg: NodeId,
    /// Resistance value in ohms.
    resistance: f64,
    /// Solved values, unknown until the pipeline completes.
    solved: Option<OperatingPoint>,
    /// Provenance record, present only on synthesized resistors.
    replacement: Option<Replacement>,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(
        id: ResistorId,
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        resistance: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            node_pos,
            node_neg,
            resistance,
            solved: None,
            replacement: None,
        }
    }

    /// Attach the provenance record of a synthesized resistor.
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = Some(replacement);
        self
    }

    /// Get the resistor's id.
    pub fn id(&self) -> ResistorId {
        self.id
    }

    /// Get the resistor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First terminal node.
    pub fn node_pos(&self) -> NodeId {
        self.node_pos
    }

    /// Second terminal node.
    pub fn node_neg(&self) -> NodeId {
        self.node_neg
    }

    /// Both terminal nodes.
    pub fn nodes(&self) -> [NodeId; 2] {
        [self.node_pos, self.node_neg]
    }

    /// Resistance value in ohms.
    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }

    /// Whether `node` is one of this resistor's terminals.
    pub fn touches(&self, node: NodeId) -> bool {
        self.node_pos == node || self.node_neg == node
    }

    /// The terminal opposite `node`, or `None` if `node` is not a terminal.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.node_pos {
            Some(self.node_neg)
        } else if node == self.node_neg {
            Some(self.node_pos)
        } else {
            None
        }
    }

    /// The node shared with `other`, when exactly one terminal is shared.
    pub fn common_node(&self, other: &Resistor) -> Option<NodeId> {
        match (other.touches(self.node_pos), other.touches(self.node_neg)) {
            (true, false) => Some(self.node_pos),
            (false, true) => Some(self.node_neg),
            _ => None,
        }
    }

    /// This resistor's terminal that is *not* shared with `other`.
    ///
    /// Meaningful only for a pair already known to be in series (exactly
    /// one shared terminal); returns `None` otherwise.
    pub fn uncommon_node(&self, other: &Resistor) -> Option<NodeId> {
        match (other.touches(self.node_pos), other.touches(self.node_neg)) {
            (false, true) => Some(self.node_pos),
            (true, false) => Some(self.node_neg),
            _ => None,
        }
    }

    /// Solved operating point, if the pipeline has run.
    pub fn solved(&self) -> Option<&OperatingPoint> {
        self.solved.as_ref()
    }

    /// Current through the resistor (A), once solved.
    pub fn amps(&self) -> Option<f64> {
        self.solved.map(|op| op.amps)
    }

    /// Voltage across the resistor (V), once solved.
    pub fn voltage_drop(&self) -> Option<f64> {
        self.solved.map(|op| op.voltage_drop)
    }

    /// Power dissipated (W), once solved.
    pub fn watts(&self) -> Option<f64> {
        self.solved.map(|op| op.watts)
    }

    /// Attach solved values. The only mutation a resistor sees after
    /// construction.
    pub fn set_solved(&mut self, op: OperatingPoint) {
        self.solved = Some(op);
    }

    /// Provenance record, present only on synthesized resistors.
    pub fn replacement(&self) -> Option<&Replacement> {
        self.replacement.as_ref()
    }
}

/// The circuit's power supply.
///
/// Exactly one per circuit; the voltage and terminal nodes are fixed at
/// construction and copied verbatim into every reduced generation.
#[derive(Debug, Clone)]
pub struct PowerSupply {
    /// Device name (e.g., "V1").
    name: String,
    /// Supply voltage in volts.
    voltage: f64,
    /// Positive terminal node.
    node_pos: NodeId,
    /// Negative terminal node.
    node_neg: NodeId,
}

impl PowerSupply {
    /// Create a new power supply.
    pub fn new(name: impl Into<String>, voltage: f64, node_pos: NodeId, node_neg: NodeId) -> Self {
        Self {
            name: name.into(),
            voltage,
            node_pos,
            node_neg,
        }
    }

    /// Get the supply's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Supply voltage in volts.
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Positive terminal node.
    pub fn node_pos(&self) -> NodeId {
        self.node_pos
    }

    /// Negative terminal node.
    pub fn node_neg(&self) -> NodeId {
        self.node_neg
    }

    /// Whether `node` is one of the supply's terminals.
    pub fn touches(&self, node: NodeId) -> bool {
        self.node_pos == node || self.node_neg == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resistor(id: u32, a: u32, b: u32) -> Resistor {
        Resistor::new(
            ResistorId::new(id),
            format!("R{id}"),
            NodeId::new(a),
            NodeId::new(b),
            100.0,
        )
    }

    #[test]
    fn test_conductance() {
        let r = resistor(0, 0, 1);
        assert!((r.conductance() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_common_node() {
        let r1 = resistor(0, 0, 1);
        let r2 = resistor(1, 1, 2);
        assert_eq!(r1.common_node(&r2), Some(NodeId::new(1)));
        assert_eq!(r2.common_node(&r1), Some(NodeId::new(1)));

        let r3 = resistor(2, 3, 4);
        assert_eq!(r1.common_node(&r3), None);

        // both terminals shared: not a series junction
        let r4 = resistor(3, 0, 1);
        assert_eq!(r1.common_node(&r4), None);
    }

    #[test]
    fn test_uncommon_node() {
        let r1 = resistor(0, 0, 1);
        let r2 = resistor(1, 1, 2);
        assert_eq!(r1.uncommon_node(&r2), Some(NodeId::new(0)));
        assert_eq!(r2.uncommon_node(&r1), Some(NodeId::new(2)));

        let r3 = resistor(2, 0, 1);
        assert_eq!(r1.uncommon_node(&r3), None);
    }

    #[test]
    fn test_other_end() {
        let r = resistor(0, 4, 7);
        assert_eq!(r.other_end(NodeId::new(4)), Some(NodeId::new(7)));
        assert_eq!(r.other_end(NodeId::new(7)), Some(NodeId::new(4)));
        assert_eq!(r.other_end(NodeId::new(9)), None);
    }

    #[test]
    fn test_operating_point_from_amps() {
        let op = OperatingPoint::from_amps(0.5, 100.0);
        assert!((op.voltage_drop - 50.0).abs() < 1e-12);
        assert!((op.watts - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_operating_point_from_voltage_drop() {
        let op = OperatingPoint::from_voltage_drop(12.0, 48.0);
        assert!((op.amps - 0.25).abs() < 1e-12);
        assert!((op.watts - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_solved_all_or_nothing() {
        let mut r = resistor(0, 0, 1);
        assert!(r.solved().is_none());
        assert!(r.amps().is_none() && r.voltage_drop().is_none() && r.watts().is_none());

        r.set_solved(OperatingPoint::from_amps(0.1, 100.0));
        assert!(r.amps().is_some() && r.voltage_drop().is_some() && r.watts().is_some());
    }

    #[test]
    fn test_supply_terminals() {
        let s = PowerSupply::new("V1", 12.0, NodeId::new(0), NodeId::new(3));
        assert_eq!(s.voltage(), 12.0);
        assert!(s.touches(NodeId::new(0)));
        assert!(s.touches(NodeId::new(3)));
        assert!(!s.touches(NodeId::new(1)));
    }
}
