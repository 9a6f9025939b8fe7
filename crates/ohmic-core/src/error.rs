//! Error types for ohmic-core.

use thiserror::Error;

use crate::element::ResistorId;
use crate::node::NodeId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("circuit has no power supply")]
    MissingSupply,

    #[error("circuit already has power supply {0}")]
    DuplicateSupply(String),

    #[error("circuit has no resistors")]
    NoResistors,

    #[error("unknown node {node} on {element}")]
    UnknownNode { node: NodeId, element: String },

    #[error("unknown node {0}")]
    NodeNotFound(NodeId),

    #[error("unknown resistor {0}")]
    ResistorNotFound(ResistorId),

    #[error("node {node} still has {degree} attached elements")]
    NodeAttached { node: NodeId, degree: usize },

    #[error("resistor {name}: endpoints must differ, both are {node}")]
    SelfLoop { name: String, node: NodeId },

    #[error("resistor {name}: resistance must be positive and finite, got {ohms}")]
    InvalidResistance { name: String, ohms: f64 },

    #[error("supply {name}: voltage must be finite, got {volts}")]
    InvalidVoltage { name: String, volts: f64 },

    #[error("dangling node {0} has no attached elements")]
    DanglingNode(String),

    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),
}

pub type Result<T> = std::result::Result<T, Error>;
