//! The execution engines for walkroot trees.
//!
//! This module provides:
//! - **errors**: Error types for engine failures
//! - **tree**: Weighted undirected tree model with dense adjacency
//! - **edge_table**: Directed-edge slot table for per-edge message storage
//! - **dfs**: Rooted post-order expected-cost engine (exact and pruned)
//! - **message_passing**: All-roots iterative relaxation engine
//! - **compare**: Driver that cross-checks and times both engines

pub mod compare;
pub mod dfs;
pub mod edge_table;
pub mod errors;
pub mod message_passing;
pub mod tree;

/// Tolerance used for floating-point cost comparisons throughout the
/// engines. Costs closer than this are treated as tied; ties keep the
/// first-encountered vertex in slot order.
pub const COST_TOLERANCE: f64 = 1e-6;
