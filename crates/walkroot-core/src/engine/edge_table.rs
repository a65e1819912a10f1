//! Directed-edge slot table for per-edge message storage.
//!
//! The message-passing engine owns one scalar per *directed* edge. Rather
//! than keying those scalars by vertex-identity pairs in a hash map, this
//! table assigns every directed adjacency entry a dense slot in CSR layout:
//! slot `offsets[i] + k` holds the value flowing *into* vertex `i` from its
//! k-th neighbor. A precomputed reverse index maps each slot (i←j) to its
//! opposite slot (j←i), so the exclude-the-sender update is O(1) per edge.

use crate::engine::errors::EngineError;
use crate::engine::tree::WalkTree;

/// Dense CSR index over the directed adjacency entries of a [`WalkTree`].
#[derive(Debug, Clone)]
pub struct DirectedEdgeTable {
    /// Prefix sums of vertex degrees; slots of vertex `i` are
    /// `offsets[i]..offsets[i + 1]`.
    offsets: Vec<u32>,
    /// For each slot (i←j), the slot (j←i).
    reverse: Vec<u32>,
}

impl DirectedEdgeTable {
    /// Builds the table from a tree's adjacency lists.
    pub fn build(tree: &WalkTree) -> Result<Self, EngineError> {
        let n = tree.len();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut total = 0u32;
        offsets.push(0);
        for slot in 0..n as u32 {
            total += tree.neighbor_count(slot) as u32;
            offsets.push(total);
        }

        // Adjacency lists are symmetric by construction, so every entry has
        // exactly one opposite entry to find.
        let mut reverse = vec![0u32; total as usize];
        for i in 0..n as u32 {
            for (k, &j) in tree.neighbors(i).iter().enumerate() {
                let back = tree
                    .neighbors(j)
                    .iter()
                    .position(|&b| b == i)
                    .ok_or_else(|| {
                        EngineError::Internal(
                            "asymmetric adjacency while indexing reverse edges".into(),
                        )
                    })?;
                reverse[(offsets[i as usize] + k as u32) as usize] =
                    offsets[j as usize] + back as u32;
            }
        }

        Ok(Self { offsets, reverse })
    }

    /// Total number of directed-edge slots (2 per undirected edge).
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    /// Whether the tree has no edges.
    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Slot range of values flowing into vertex `i`.
    pub fn incoming_slots(&self, i: u32) -> std::ops::Range<usize> {
        self.offsets[i as usize] as usize..self.offsets[i as usize + 1] as usize
    }

    /// Slot of the value flowing into `i` from its `k`-th neighbor.
    pub fn slot(&self, i: u32, k: usize) -> usize {
        (self.offsets[i as usize] + k as u32) as usize
    }

    /// Opposite slot: maps (i←j) to (j←i).
    pub fn reverse_slot(&self, slot: usize) -> usize {
        self.reverse[slot] as usize
    }
}
