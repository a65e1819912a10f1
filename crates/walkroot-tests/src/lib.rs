//! Shared fixtures for the walkroot integration tests.
//!
//! The fixtures mirror the reference graphs the engines were originally
//! validated against: a 3-vertex star, a 5-vertex tree, and chains of
//! 5-vertex trees linked root-to-root for stress tests.

use walkroot_core::{VertexId, WalkTree};

/// 3-vertex star: center weight 30, leaves 20 and 10; edges {1,2} {1,3}.
///
/// Expected costs: vertex 1 = 45, vertices 2 and 3 = 60.
pub fn star3() -> WalkTree {
    let mut tree = WalkTree::new();
    for (id, w) in [(1, 30.0), (2, 20.0), (3, 10.0)] {
        tree.add_vertex(VertexId(id), w).unwrap();
    }
    tree.add_undirected_edge(VertexId(1), VertexId(2)).unwrap();
    tree.add_undirected_edge(VertexId(1), VertexId(3)).unwrap();
    tree
}

/// 5-vertex fixture: weights [30, 20, 10, 40, 50], edges {1,2} {1,3} {1,4}
/// {3,5}.
///
/// Expected costs: v1 = 70, v2 = 100, v3 = 65, v4 = 110, v5 = 120; the
/// minimum is vertex 3 at 65.
pub fn g5() -> WalkTree {
    chained_g5(1)
}

/// Chains `k` copies of [`g5`] by linking consecutive copies' first
/// vertices, producing a 5k-vertex tree with ids 1..=5k.
pub fn chained_g5(k: u32) -> WalkTree {
    assert!(k >= 1);
    let weights = [30.0, 20.0, 10.0, 40.0, 50.0];
    let edges = [(1, 2), (1, 3), (1, 4), (3, 5)];
    let mut tree = WalkTree::with_capacity(5 * k as usize);
    for copy in 0..k {
        let base = copy * 5;
        for (offset, w) in weights.iter().enumerate() {
            tree.add_vertex(VertexId(base + offset as u32 + 1), *w)
                .unwrap();
        }
        for (a, b) in edges {
            tree.add_undirected_edge(VertexId(base + a), VertexId(base + b))
                .unwrap();
        }
        if copy > 0 {
            // Link this copy's root to the previous copy's root.
            tree.add_undirected_edge(VertexId(base - 4), VertexId(base + 1))
                .unwrap();
        }
    }
    tree
}

/// Path of `len` vertices with weights 1..=len, ids 1..=len.
pub fn path(len: u32) -> WalkTree {
    let mut tree = WalkTree::with_capacity(len as usize);
    for id in 1..=len {
        tree.add_vertex(VertexId(id), f64::from(id)).unwrap();
    }
    for id in 1..len {
        tree.add_undirected_edge(VertexId(id), VertexId(id + 1))
            .unwrap();
    }
    tree
}
