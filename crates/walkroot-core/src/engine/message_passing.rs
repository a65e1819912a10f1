//! # Iterative message-passing engine
//!
//! Computes the expected traversal cost of *every* candidate root at once.
//! Each directed edge (i←j) carries one scalar message: the expected cost
//! vertex j contributes toward a walk that reaches j from i's side. Messages
//! are refined in synchronized rounds until they stabilize or the round
//! budget (vertex count − 1, a safe bound on the tree diameter) is spent;
//! each vertex's total cost then follows from its incoming messages.
//!
//! ## Update rule
//!
//! Messages seed to the sender's own weight ("if j were a leaf reached from
//! here, its contribution is just its weight") and refine as
//!
//! ```text
//! msg'(i←j) = weight(j) + (sum_in(j) − msg(j←i)) / (deg(j) − 1)   deg(j) ≥ 2
//! msg'(i←j) = weight(j)                                           otherwise
//! ```
//!
//! subtracting the message that flowed from i so the update never feeds i's
//! own information back to it (the exclude-the-sender rule).
//!
//! Every round is a **batch**: all new messages are computed from the
//! previous round's snapshot before any of them is consulted (double buffer
//! plus `std::mem::swap`). Interleaving reads and writes within one round
//! breaks convergence.

use crate::engine::edge_table::DirectedEdgeTable;
use crate::engine::errors::EngineError;
use crate::engine::tree::{RootCost, WalkTree};

/// Configuration for the message-passing engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessagePassingConfig {
    /// Maximum relaxation rounds. `None` uses vertex count − 1, which
    /// always suffices for exact convergence on a tree.
    pub max_rounds: Option<usize>,
    /// Convergence threshold on the max absolute change of any vertex's
    /// incoming-message sum between rounds. Never compared exactly.
    pub convergence_tolerance: f64,
    /// Stop as soon as no sum moves by more than the tolerance. Disable to
    /// run the fixed round budget unconditionally (simpler to reason about,
    /// asymptotically slower).
    pub early_stop: bool,
}

impl Default for MessagePassingConfig {
    fn default() -> Self {
        Self {
            max_rounds: None,
            convergence_tolerance: 1e-6,
            early_stop: true,
        }
    }
}

impl MessagePassingConfig {
    fn validate(self) -> Result<Self, EngineError> {
        if self.convergence_tolerance <= 0.0 || !self.convergence_tolerance.is_finite() {
            return Err(EngineError::ValidationError(
                "message passing: convergence_tolerance must be finite and > 0".into(),
            ));
        }
        Ok(self)
    }
}

/// Runtime diagnostics emitted by the message-passing engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessagePassingDiagnostics {
    /// Round budget configured for this run.
    pub max_rounds: usize,
    /// Number of synchronized rounds actually executed.
    pub rounds_run: usize,
    /// Whether the tolerance was reached before the round budget.
    pub converged: bool,
    /// Max absolute incoming-sum delta after the last round.
    pub final_max_delta: f64,
    /// Number of directed-edge messages maintained.
    pub directed_edge_count: usize,
}

/// Finds the minimum expected-cost root with default configuration.
pub fn min_cost_root(tree: &WalkTree) -> Result<RootCost, EngineError> {
    min_cost_root_with_config(tree, MessagePassingConfig::default())
}

/// Finds the minimum expected-cost root with explicit configuration.
pub fn min_cost_root_with_config(
    tree: &WalkTree,
    config: MessagePassingConfig,
) -> Result<RootCost, EngineError> {
    min_cost_root_with_diagnostics(tree, config).map(|(root, _)| root)
}

/// Finds the minimum expected-cost root, returning convergence diagnostics.
pub fn min_cost_root_with_diagnostics(
    tree: &WalkTree,
    config: MessagePassingConfig,
) -> Result<(RootCost, MessagePassingDiagnostics), EngineError> {
    let config = config.validate()?;
    if tree.is_empty() {
        return Err(EngineError::EmptyGraph(
            "cannot search roots of an empty graph".into(),
        ));
    }

    let n = tree.len();
    let table = DirectedEdgeTable::build(tree)?;
    let max_rounds = config.max_rounds.unwrap_or(n.saturating_sub(1));

    let mut diagnostics = MessagePassingDiagnostics {
        max_rounds,
        rounds_run: 0,
        converged: true,
        final_max_delta: 0.0,
        directed_edge_count: table.len(),
    };

    // Seed: each message carries just the sender's weight.
    let mut messages = vec![0.0f64; table.len()];
    for i in 0..n as u32 {
        for (k, &j) in tree.neighbors(i).iter().enumerate() {
            messages[table.slot(i, k)] = tree.weight(j);
        }
    }
    let mut next_messages = messages.clone();

    let mut sums = incoming_sums(&table, &messages, n);

    if !table.is_empty() {
        diagnostics.converged = false;
        for round in 0..max_rounds {
            // Batch pass: read only the previous round's messages and sums.
            for i in 0..n as u32 {
                for (k, &j) in tree.neighbors(i).iter().enumerate() {
                    let slot = table.slot(i, k);
                    let from_i = messages[table.reverse_slot(slot)];
                    let deg_j = tree.neighbor_count(j);
                    let upstream = if deg_j >= 2 {
                        (sums[j as usize] - from_i) / (deg_j - 1) as f64
                    } else {
                        0.0
                    };
                    next_messages[slot] = tree.weight(j) + upstream;
                }
            }
            std::mem::swap(&mut messages, &mut next_messages);

            let mut max_delta = 0.0f64;
            for (i, sum) in sums.iter_mut().enumerate() {
                let fresh: f64 = messages[table.incoming_slots(i as u32)].iter().sum();
                max_delta = max_delta.max((fresh - *sum).abs());
                *sum = fresh;
            }

            diagnostics.rounds_run = round + 1;
            diagnostics.final_max_delta = max_delta;
            tracing::debug!(round = round + 1, max_delta, "message passing round");
            if max_delta < config.convergence_tolerance {
                diagnostics.converged = true;
                if config.early_stop {
                    break;
                }
            }
        }
    }

    // Derive every root's cost from its converged incoming sum; tolerance-
    // gated update keeps the first-encountered vertex on ties.
    let mut best_slot = 0u32;
    let mut best_cost = f64::INFINITY;
    for slot in 0..n as u32 {
        let deg = tree.neighbor_count(slot);
        let cost = if deg > 0 {
            tree.weight(slot) + sums[slot as usize] / deg as f64
        } else {
            tree.weight(slot)
        };
        if cost + config.convergence_tolerance < best_cost {
            best_cost = cost;
            best_slot = slot;
        }
    }

    Ok((
        RootCost {
            vertex: tree.vertex_id(best_slot),
            expected_cost: best_cost,
        },
        diagnostics,
    ))
}

fn incoming_sums(table: &DirectedEdgeTable, messages: &[f64], n: usize) -> Vec<f64> {
    (0..n as u32)
        .map(|i| messages[table.incoming_slots(i)].iter().sum())
        .collect()
}
