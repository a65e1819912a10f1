//! # Rooted-DFS expected-cost engine
//!
//! Computes, for a chosen root, the expected total cost of a uniform-random
//! walk that visits every vertex of the tree exactly once. Every vertex
//! contributes `weight(v) + mean(child costs)`, where the mean runs over the
//! neighbors still unvisited when `v` is reached: all neighbors for the
//! root, all-but-the-arrival-edge for everyone else. A leaf contributes
//! exactly its own weight.
//!
//! ## Design
//!
//! - Post-order evaluation uses an explicit work stack (preorder discovery,
//!   then a reverse-order combine), not call-stack recursion, so deep or
//!   unbalanced trees cannot overflow the call stack.
//! - Traversal scratch (`visited`, parents, accumulators) is local to each
//!   invocation, which keeps runs independent and lets the per-root sweep
//!   run in parallel under the `parallel` feature.
//! - [`min_cost_root_pruned`] is a faithful port of the historical
//!   branch-and-bound fast path. Its bound test is **not sound** (see the
//!   function docs); it is kept as an approximate heuristic, clearly
//!   labeled, rather than silently corrected.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::errors::EngineError;
use crate::engine::tree::{RootCost, VertexId, WalkTree};
use crate::engine::COST_TOLERANCE;

/// Exact expected cost of visiting the whole tree starting at `root`.
pub fn expected_cost(tree: &WalkTree, root: VertexId) -> Result<f64, EngineError> {
    if tree.is_empty() {
        return Err(EngineError::EmptyGraph(
            "cannot evaluate a root on an empty graph".into(),
        ));
    }
    let slot = tree
        .slot_of(root)
        .ok_or_else(|| EngineError::ValidationError(format!("unknown vertex {root}")))?;
    Ok(expected_cost_slot(tree, slot))
}

/// Exact expected cost for a dense slot, with per-call scratch state.
///
/// Two passes over an explicit stack: discover vertices in preorder while
/// recording parents, then combine child costs in reverse discovery order.
/// Only vertices reachable from `root` participate; the input is assumed to
/// be a connected tree.
pub(crate) fn expected_cost_slot(tree: &WalkTree, root: u32) -> f64 {
    let n = tree.len();
    const NO_PARENT: u32 = u32::MAX;

    let mut visited = vec![false; n];
    let mut parent = vec![NO_PARENT; n];
    let mut order = Vec::with_capacity(n);
    let mut stack = vec![root];
    visited[root as usize] = true;

    while let Some(v) = stack.pop() {
        order.push(v);
        for &w in tree.neighbors(v) {
            if !visited[w as usize] {
                visited[w as usize] = true;
                parent[w as usize] = v;
                stack.push(w);
            }
        }
    }

    // Reverse preorder is a valid post-order: children always combine
    // before their parent.
    let mut child_sum = vec![0.0f64; n];
    let mut child_count = vec![0u32; n];
    let mut root_cost = 0.0;
    for &v in order.iter().rev() {
        let vi = v as usize;
        let cost = if child_count[vi] > 0 {
            tree.weight(v) + child_sum[vi] / f64::from(child_count[vi])
        } else {
            tree.weight(v)
        };
        match parent[vi] {
            NO_PARENT => root_cost = cost,
            p => {
                child_sum[p as usize] += cost;
                child_count[p as usize] += 1;
            }
        }
    }
    root_cost
}

/// Evaluates every candidate root exactly and returns the minimum.
///
/// One full post-order evaluation per root with fresh scratch state, O(V²)
/// total. Ties within [`COST_TOLERANCE`] keep the first-encountered vertex.
pub fn min_cost_root(tree: &WalkTree) -> Result<RootCost, EngineError> {
    if tree.is_empty() {
        return Err(EngineError::EmptyGraph(
            "cannot search roots of an empty graph".into(),
        ));
    }

    let mut best_slot = 0u32;
    let mut best_cost = expected_cost_slot(tree, 0);
    for slot in 1..tree.len() as u32 {
        let cost = expected_cost_slot(tree, slot);
        if cost + COST_TOLERANCE < best_cost {
            best_cost = cost;
            best_slot = slot;
        }
    }

    Ok(RootCost {
        vertex: tree.vertex_id(best_slot),
        expected_cost: best_cost,
    })
}

/// Parallel per-root exact sweep.
///
/// The per-root evaluations are independent (each owns its scratch state),
/// so the sweep is embarrassingly parallel. The reduction is deterministic:
/// within [`COST_TOLERANCE`] the lower slot wins, matching the sequential
/// first-encountered tie-break.
#[cfg(feature = "parallel")]
pub fn min_cost_root_parallel(tree: &WalkTree) -> Result<RootCost, EngineError> {
    if tree.is_empty() {
        return Err(EngineError::EmptyGraph(
            "cannot search roots of an empty graph".into(),
        ));
    }

    let (best_slot, best_cost) = (0..tree.len() as u32)
        .into_par_iter()
        .map(|slot| (slot, expected_cost_slot(tree, slot)))
        .reduce(
            || (u32::MAX, f64::INFINITY),
            |a, b| {
                let (sa, ca) = a;
                let (sb, cb) = b;
                if (ca - cb).abs() <= COST_TOLERANCE {
                    if sa <= sb {
                        a
                    } else {
                        b
                    }
                } else if ca < cb {
                    a
                } else {
                    b
                }
            },
        );

    Ok(RootCost {
        vertex: tree.vertex_id(best_slot),
        expected_cost: best_cost,
    })
}

/// Expected cost for one root with a branch-and-bound cutoff, or `None` if
/// the evaluation was abandoned.
///
/// Heuristic fast path, ported unchanged from the historical implementation:
/// the unvisited-neighbor count is fixed at entry to each vertex, and after
/// each child subtree completes the partial cost
/// `weight(v) + (acc + child) / count` is tested against `bound`; exceeding
/// it abandons the entire root. The test is **not sound**: a child cost may
/// exceed the bound and still be divided below it by an ancestor's larger
/// neighbor count, so this variant can abandon roots whose true cost beats
/// the bound. Treat results as approximate; [`min_cost_root`] is the exact
/// engine. `None` never escapes the sweep in
/// [`min_cost_root_pruned`], which treats it as "no candidate from this
/// root".
pub fn expected_cost_pruned(
    tree: &WalkTree,
    root: VertexId,
    bound: f64,
) -> Result<Option<f64>, EngineError> {
    if tree.is_empty() {
        return Err(EngineError::EmptyGraph(
            "cannot evaluate a root on an empty graph".into(),
        ));
    }
    let slot = tree
        .slot_of(root)
        .ok_or_else(|| EngineError::ValidationError(format!("unknown vertex {root}")))?;
    Ok(expected_cost_pruned_slot(tree, slot, bound))
}

/// Slot-addressed form of [`expected_cost_pruned`]; see its docs for the
/// cutoff semantics and the soundness caveat.
pub(crate) fn expected_cost_pruned_slot(tree: &WalkTree, root: u32, bound: f64) -> Option<f64> {
    struct Frame {
        slot: u32,
        acc: f64,
        // Unvisited-neighbor count at entry; fixed divisor even though
        // deeper traversal mutates the scratch state afterwards.
        to_visit: u32,
        next_child: usize,
    }

    let n = tree.len();
    let mut visited = vec![false; n];

    let count = tree.unvisited_neighbor_count(root, &visited);
    if count == 0 {
        return Some(tree.weight(root));
    }
    visited[root as usize] = true;

    let mut stack = vec![Frame {
        slot: root,
        acc: 0.0,
        to_visit: count as u32,
        next_child: 0,
    }];
    // Cost delivered by the most recently completed child, if any.
    let mut completed: Option<f64> = None;

    'walk: while let Some(top) = stack.len().checked_sub(1) {
        if let Some(child_cost) = completed.take() {
            let tentative = stack[top].acc + child_cost;
            let partial =
                tree.weight(stack[top].slot) + tentative / f64::from(stack[top].to_visit);
            if partial > bound {
                return None;
            }
            stack[top].acc = tentative;
        }

        while stack[top].next_child < tree.neighbor_count(stack[top].slot) {
            let child = tree.neighbors(stack[top].slot)[stack[top].next_child];
            stack[top].next_child += 1;
            if visited[child as usize] {
                continue;
            }
            let child_count = tree.unvisited_neighbor_count(child, &visited);
            visited[child as usize] = true;
            if child_count == 0 {
                completed = Some(tree.weight(child));
            } else {
                stack.push(Frame {
                    slot: child,
                    acc: 0.0,
                    to_visit: child_count as u32,
                    next_child: 0,
                });
            }
            continue 'walk;
        }

        if let Some(frame) = stack.pop() {
            completed = Some(tree.weight(frame.slot) + frame.acc / f64::from(frame.to_visit));
        }
    }

    completed
}

/// Per-root sweep using the pruned evaluator, threading the best-so-far
/// cost as the bound for subsequent roots.
///
/// The first root always runs with an infinite bound, so a result always
/// exists. Because the cutoff is unsound (see [`expected_cost_pruned`]),
/// later roots with a lower true cost can be abandoned; the answer is a
/// fast approximation, not a guarantee.
pub fn min_cost_root_pruned(tree: &WalkTree) -> Result<RootCost, EngineError> {
    if tree.is_empty() {
        return Err(EngineError::EmptyGraph(
            "cannot search roots of an empty graph".into(),
        ));
    }

    let mut best_slot = 0u32;
    let mut best_cost = f64::INFINITY;
    for slot in 0..tree.len() as u32 {
        match expected_cost_pruned_slot(tree, slot, best_cost) {
            Some(cost) if cost < best_cost => {
                best_cost = cost;
                best_slot = slot;
            }
            Some(_) => {}
            None => {
                tracing::debug!(
                    vertex = %tree.vertex_id(slot),
                    "pruned sweep abandoned root"
                );
            }
        }
    }

    Ok(RootCost {
        vertex: tree.vertex_id(best_slot),
        expected_cost: best_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3-vertex star: center 30, leaves 20 and 10.
    fn star3() -> WalkTree {
        let mut tree = WalkTree::new();
        for (id, w) in [(1, 30.0), (2, 20.0), (3, 10.0)] {
            tree.add_vertex(VertexId(id), w).unwrap();
        }
        tree.add_undirected_edge(VertexId(1), VertexId(2)).unwrap();
        tree.add_undirected_edge(VertexId(1), VertexId(3)).unwrap();
        tree
    }

    /// 5-vertex fixture: weights [30, 20, 10, 40, 50],
    /// edges {1,2} {1,3} {1,4} {3,5}.
    fn g5() -> WalkTree {
        let mut tree = WalkTree::new();
        for (id, w) in [(1, 30.0), (2, 20.0), (3, 10.0), (4, 40.0), (5, 50.0)] {
            tree.add_vertex(VertexId(id), w).unwrap();
        }
        tree.add_undirected_edge(VertexId(1), VertexId(2)).unwrap();
        tree.add_undirected_edge(VertexId(1), VertexId(3)).unwrap();
        tree.add_undirected_edge(VertexId(1), VertexId(4)).unwrap();
        tree.add_undirected_edge(VertexId(3), VertexId(5)).unwrap();
        tree
    }

    #[test]
    fn star3_expected_costs() {
        let tree = star3();
        // center: 30 + (20 + 10)/2; leaves walk the whole star
        assert!((expected_cost(&tree, VertexId(1)).unwrap() - 45.0).abs() < 1e-9);
        assert!((expected_cost(&tree, VertexId(2)).unwrap() - 60.0).abs() < 1e-9);
        assert!((expected_cost(&tree, VertexId(3)).unwrap() - 60.0).abs() < 1e-9);

        let best = min_cost_root(&tree).unwrap();
        assert_eq!(best.vertex, VertexId(1));
        assert!((best.expected_cost - 45.0).abs() < 1e-9);
    }

    #[test]
    fn g5_expected_costs() {
        let tree = g5();
        let reference = [
            (1, 30.0 + (20.0 + (10.0 + 50.0) + 40.0) / 3.0), // 70
            (2, 20.0 + 30.0 + ((10.0 + 50.0) + 40.0) / 2.0), // 100
            (3, 10.0 + (50.0 + (30.0 + (20.0 + 40.0) / 2.0)) / 2.0), // 65
            (4, 40.0 + 30.0 + (20.0 + (10.0 + 50.0)) / 2.0), // 110
            (5, 50.0 + 10.0 + (30.0 + (20.0 + 40.0) / 2.0)), // 120
        ];
        for (id, want) in reference {
            let got = expected_cost(&tree, VertexId(id)).unwrap();
            assert!((got - want).abs() < 1e-9, "vertex {id}: {got} != {want}");
        }

        let best = min_cost_root(&tree).unwrap();
        assert_eq!(best.vertex, VertexId(3));
        assert!((best.expected_cost - 65.0).abs() < 1e-9);
    }

    #[test]
    fn single_vertex_costs_its_own_weight() {
        let mut tree = WalkTree::new();
        tree.add_vertex(VertexId(7), 12.5).unwrap();
        assert_eq!(expected_cost(&tree, VertexId(7)).unwrap(), 12.5);
        let best = min_cost_root(&tree).unwrap();
        assert_eq!(best.vertex, VertexId(7));
        assert_eq!(best.expected_cost, 12.5);
    }

    #[test]
    fn empty_graph_is_rejected() {
        let tree = WalkTree::new();
        assert!(matches!(
            min_cost_root(&tree),
            Err(EngineError::EmptyGraph(_))
        ));
        assert!(matches!(
            min_cost_root_pruned(&tree),
            Err(EngineError::EmptyGraph(_))
        ));
        assert!(matches!(
            expected_cost(&tree, VertexId(1)),
            Err(EngineError::EmptyGraph(_))
        ));
    }

    #[test]
    fn deep_chain_does_not_overflow_the_stack() {
        let n = 50_000u32;
        let mut tree = WalkTree::with_capacity(n as usize);
        for id in 1..=n {
            tree.add_vertex(VertexId(id), 1.0).unwrap();
        }
        for id in 1..n {
            tree.add_undirected_edge(VertexId(id), VertexId(id + 1))
                .unwrap();
        }
        // End of the chain: every vertex is visited exactly once, so the
        // expected cost is the plain weight sum.
        let cost = expected_cost(&tree, VertexId(1)).unwrap();
        assert!((cost - n as f64).abs() < 1e-6);

        let pruned = expected_cost_pruned(&tree, VertexId(1), f64::INFINITY)
            .unwrap()
            .unwrap();
        assert!((pruned - cost).abs() < 1e-9);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let tree = g5();
        let first = min_cost_root(&tree).unwrap();
        let second = min_cost_root(&tree).unwrap();
        assert_eq!(first.vertex, second.vertex);
        assert!((first.expected_cost - second.expected_cost).abs() < 1e-12);
    }

    #[test]
    fn pruned_evaluator_matches_exact_with_infinite_bound() {
        let tree = g5();
        for slot in 0..tree.len() as u32 {
            let exact = expected_cost_slot(&tree, slot);
            let pruned = expected_cost_pruned_slot(&tree, slot, f64::INFINITY).unwrap();
            assert!((exact - pruned).abs() < 1e-9);
        }
    }

    #[test]
    fn pruned_evaluator_abandons_under_a_tight_bound() {
        let tree = star3();
        assert_eq!(expected_cost_pruned(&tree, VertexId(1), 10.0).unwrap(), None);
    }

    #[test]
    fn pruned_evaluator_validates_the_root() {
        let tree = star3();
        assert!(matches!(
            expected_cost_pruned(&tree, VertexId(99), f64::INFINITY),
            Err(EngineError::ValidationError(_))
        ));
        assert!(matches!(
            expected_cost_pruned(&WalkTree::new(), VertexId(1), f64::INFINITY),
            Err(EngineError::EmptyGraph(_))
        ));
    }

    #[test]
    fn pruned_sweep_finds_the_fixture_minima() {
        // The heuristic is unsound in general, but on these fixtures it
        // agrees with the exact sweep (the historical behavior).
        let star = star3();
        let best = min_cost_root_pruned(&star).unwrap();
        assert_eq!(best.vertex, VertexId(1));
        assert!((best.expected_cost - 45.0).abs() < 1e-9);

        let tree = g5();
        let best = min_cost_root_pruned(&tree).unwrap();
        assert_eq!(best.vertex, VertexId(3));
        assert!((best.expected_cost - 65.0).abs() < 1e-9);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_sweep_matches_sequential() {
        let tree = g5();
        let seq = min_cost_root(&tree).unwrap();
        let par = min_cost_root_parallel(&tree).unwrap();
        assert_eq!(seq.vertex, par.vertex);
        assert!((seq.expected_cost - par.expected_cost).abs() < 1e-12);
    }
}
