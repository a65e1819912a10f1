//! # Weighted undirected tree model
//!
//! Shared data model for both engines: a write-once, read-many tree of
//! weighted vertices with dense slot-indexed adjacency.
//!
//! ## Design
//!
//! - Vertices carry a stable external [`VertexId`] and a non-negative
//!   per-visit `weight`; identity (never weight) drives lookup and equality.
//! - Internally vertices live in dense slots (`0..len`); adjacency lists are
//!   `SmallVec`s of neighbor slots in insertion order, so typical low-degree
//!   tree vertices stay inline.
//! - Traversal state (`visited`) is *not* stored on the vertex. Each engine
//!   run owns a local `Vec<bool>` keyed by slot, which keeps runs independent
//!   and makes per-root sweeps safe to parallelize.
//!
//! The structure is assumed to be a tree (V−1 edges, connected, acyclic).
//! The engines do not verify this; behavior on cyclic or disconnected input
//! is unspecified.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::engine::errors::EngineError;

/// Maximum adjacency size stored inline before spilling to the heap.
const INLINE_ADJ_SIZE: usize = 8;

/// A unique identifier for a vertex.
///
/// VertexId implements Ord/PartialOrd for stable, deterministic iteration.
/// Uses u32 internally for efficient storage and indexing.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct VertexId(pub u32);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A winning root: the vertex with the minimum expected traversal cost,
/// together with that cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootCost {
    /// The vertex minimizing the expected cost.
    pub vertex: VertexId,
    /// The expected total cost of a random walk started at `vertex`.
    pub expected_cost: f64,
}

/// Weighted undirected tree with dense adjacency.
///
/// Built once per problem instance via [`add_vertex`](Self::add_vertex) and
/// [`add_undirected_edge`](Self::add_undirected_edge); there is no removal
/// operation.
#[derive(Debug, Clone, Default)]
pub struct WalkTree {
    ids: Vec<VertexId>,
    weights: Vec<f64>,
    adjacency: Vec<SmallVec<[u32; INLINE_ADJ_SIZE]>>,
    index: FxHashMap<VertexId, u32>,
}

impl WalkTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree with capacity for `n` vertices.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            ids: Vec::with_capacity(n),
            weights: Vec::with_capacity(n),
            adjacency: Vec::with_capacity(n),
            index: FxHashMap::default(),
        }
    }

    /// Adds a vertex with the given external id and per-visit weight.
    ///
    /// Weights must be finite and non-negative; duplicate ids are rejected.
    pub fn add_vertex(&mut self, id: VertexId, weight: f64) -> Result<(), EngineError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(EngineError::ValidationError(format!(
                "vertex {id}: weight must be finite and >= 0, got {weight}"
            )));
        }
        if self.index.contains_key(&id) {
            return Err(EngineError::ValidationError(format!(
                "vertex {id} already exists"
            )));
        }
        let slot = self.ids.len() as u32;
        self.index.insert(id, slot);
        self.ids.push(id);
        self.weights.push(weight);
        self.adjacency.push(SmallVec::new());
        Ok(())
    }

    /// Adds an undirected edge between two existing vertices.
    ///
    /// Appends each endpoint to the other's adjacency list exactly once; this
    /// is the only mutation path and is always symmetric. The caller must not
    /// add the same unordered pair twice (not checked).
    pub fn add_undirected_edge(&mut self, a: VertexId, b: VertexId) -> Result<(), EngineError> {
        if a == b {
            return Err(EngineError::ValidationError(format!(
                "self-loop on vertex {a} is not a tree edge"
            )));
        }
        let sa = self.require_slot(a)?;
        let sb = self.require_slot(b)?;
        self.adjacency[sa as usize].push(sb);
        self.adjacency[sb as usize].push(sa);
        Ok(())
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the tree has no vertices.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Total number of directed adjacency entries (2 per undirected edge).
    pub fn directed_edge_count(&self) -> usize {
        self.adjacency.iter().map(|adj| adj.len()).sum()
    }

    /// External id of the vertex in `slot`.
    pub fn vertex_id(&self, slot: u32) -> VertexId {
        self.ids[slot as usize]
    }

    /// Dense slot of the vertex with the given external id, if present.
    pub fn slot_of(&self, id: VertexId) -> Option<u32> {
        self.index.get(&id).copied()
    }

    /// Per-visit weight of the vertex in `slot`.
    pub fn weight(&self, slot: u32) -> f64 {
        self.weights[slot as usize]
    }

    /// Neighbor slots of the vertex in `slot`, in insertion order.
    pub fn neighbors(&self, slot: u32) -> &[u32] {
        &self.adjacency[slot as usize]
    }

    /// Degree of the vertex in `slot`.
    pub fn neighbor_count(&self, slot: u32) -> usize {
        self.adjacency[slot as usize].len()
    }

    /// Number of neighbors of `slot` not yet marked in `visited`.
    ///
    /// O(degree), recomputed on demand; keeping no cached per-vertex count
    /// keeps traversal-state mutation confined to the caller's scratch array.
    pub fn unvisited_neighbor_count(&self, slot: u32, visited: &[bool]) -> usize {
        self.adjacency[slot as usize]
            .iter()
            .filter(|&&n| !visited[n as usize])
            .count()
    }

    fn require_slot(&self, id: VertexId) -> Result<u32, EngineError> {
        self.slot_of(id)
            .ok_or_else(|| EngineError::ValidationError(format!("unknown vertex {id}")))
    }
}
