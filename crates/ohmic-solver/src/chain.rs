//! Reduction chains: the generations produced while collapsing a
//! network.
//!
//! A chain is an arena of circuit snapshots, root first. Parent links
//! are [`CircuitId`] indices into the arena, so ownership stays acyclic
//! and the whole chain drops trivially.

use ohmic_core::{Circuit, CircuitId};

/// The generations of one reduction run, root first.
#[derive(Debug)]
pub struct ReductionChain {
    circuits: Vec<Circuit>,
}

impl ReductionChain {
    /// Start a chain at its root network.
    pub fn new(root: Circuit) -> Self {
        Self {
            circuits: vec![root],
        }
    }

    /// The original network.
    pub fn root(&self) -> &Circuit {
        &self.circuits[0]
    }

    /// The most-reduced generation.
    pub fn tip(&self) -> &Circuit {
        self.circuits
            .last()
            .expect("chain always holds its root")
    }

    /// The most-reduced generation, mutably.
    pub fn tip_mut(&mut self) -> &mut Circuit {
        self.circuits
            .last_mut()
            .expect("chain always holds its root")
    }

    /// Get a generation by id.
    pub fn get(&self, id: CircuitId) -> Option<&Circuit> {
        self.circuits.get(id.index())
    }

    /// Number of generations (root included).
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// A chain always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of combination steps performed.
    pub fn steps(&self) -> usize {
        self.circuits.len() - 1
    }

    /// Iterate over the generations, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Circuit> {
        self.circuits.iter()
    }

    /// Append the next generation, linking it to the current tip.
    pub fn push(&mut self, mut child: Circuit) -> CircuitId {
        child.set_parent(CircuitId::new((self.circuits.len() - 1) as u32));
        let id = CircuitId::new(self.circuits.len() as u32);
        self.circuits.push(child);
        id
    }

    /// Borrow generation `k - 1` mutably together with generation `k`.
    ///
    /// Back-substitution writes into the parent while reading the
    /// child.
    pub(crate) fn parent_child(&mut self, k: usize) -> (&mut Circuit, &Circuit) {
        let (left, right) = self.circuits.split_at_mut(k);
        (&mut left[k - 1], &right[0])
    }
}
