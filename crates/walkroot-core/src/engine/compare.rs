//! Driver that runs both engines over one tree and cross-checks them.
//!
//! Validation and benchmarking only: this is the single place where the
//! rooted-DFS and message-passing engines interact. The pruned DFS variant
//! is approximate, so it is reported when requested but never participates
//! in the agreement verdict.

use std::time::{Duration, Instant};

use crate::engine::errors::EngineError;
use crate::engine::message_passing::{self, MessagePassingConfig};
use crate::engine::tree::{RootCost, WalkTree};
use crate::engine::{dfs, COST_TOLERANCE};

/// One engine's verdict on a tree, with wall-clock timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineReport {
    /// Stable engine identifier for diagnostics/logging.
    pub engine: &'static str,
    /// Winning vertex and its expected cost.
    pub root: RootCost,
    /// Wall-clock time spent inside the engine.
    pub elapsed: Duration,
}

/// Result of running the exact engines (and optionally the pruned
/// heuristic) over the same tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonReport {
    /// Exact per-root DFS sweep.
    pub exact: EngineReport,
    /// All-roots message passing.
    pub message_passing: EngineReport,
    /// Branch-and-bound heuristic sweep, if requested.
    pub pruned: Option<EngineReport>,
    /// Whether the two exact engines agree on the minimum cost within
    /// [`COST_TOLERANCE`].
    pub agreement: bool,
}

/// Runs both engines over `tree` and reports winners, costs, and timings.
pub fn compare_engines(
    tree: &WalkTree,
    config: MessagePassingConfig,
    include_pruned: bool,
) -> Result<ComparisonReport, EngineError> {
    let exact = timed("dfs", || dfs::min_cost_root(tree))?;
    let message_passing = timed("message-passing", || {
        message_passing::min_cost_root_with_config(tree, config)
    })?;
    let pruned = if include_pruned {
        Some(timed("dfs-pruned", || dfs::min_cost_root_pruned(tree))?)
    } else {
        None
    };

    let agreement = (exact.root.expected_cost - message_passing.root.expected_cost).abs()
        <= COST_TOLERANCE;
    tracing::debug!(
        exact = exact.root.expected_cost,
        message_passing = message_passing.root.expected_cost,
        agreement,
        "engine comparison"
    );

    Ok(ComparisonReport {
        exact,
        message_passing,
        pruned,
        agreement,
    })
}

fn timed(
    engine: &'static str,
    run: impl FnOnce() -> Result<RootCost, EngineError>,
) -> Result<EngineReport, EngineError> {
    let start = Instant::now();
    let root = run()?;
    let elapsed = start.elapsed();
    tracing::debug!(engine, vertex = %root.vertex, cost = root.expected_cost, ?elapsed, "engine finished");
    Ok(EngineReport {
        engine,
        root,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tree::VertexId;

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
    fn engines_agree_on_the_fixture() {
        let report = compare_engines(&g5(), MessagePassingConfig::default(), true).unwrap();
        assert!(report.agreement);
        assert_eq!(report.exact.root.vertex, VertexId(3));
        assert_eq!(report.message_passing.root.vertex, VertexId(3));
        let pruned = report.pruned.expect("pruned report requested");
        assert_eq!(pruned.root.vertex, VertexId(3));
    }

    #[test]
    fn empty_graph_fails_before_any_engine_runs() {
        let err = compare_engines(&WalkTree::new(), MessagePassingConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyGraph(_)));
    }
}
