//! Core circuit representation for ohmic.
//!
//! This crate provides the fundamental data structures for representing
//! resistive DC networks: nodes, resistors, the power supply, and the
//! circuit generations produced while a network is reduced. Each circuit
//! owns its own node and resistor arenas; identifiers are arena indices
//! that stay stable when a generation is copied.

pub mod circuit;
pub mod element;
pub mod error;
pub mod node;
pub mod replacement;

pub use circuit::{Circuit, CircuitBuilder, CircuitId};
pub use element::{ElementRef, OperatingPoint, PowerSupply, Resistor, ResistorId};
pub use error::{Error, Result};
pub use node::{Node, NodeId};
pub use replacement::{Replacement, ReplacementKind};
