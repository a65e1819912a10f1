//! # Walkroot Core
//!
//! Core engine for the minimum expected traversal cost root problem:
//! given an undirected tree of weighted vertices, find the start vertex
//! minimizing the expected total cost of a uniform-random walk that visits
//! every other vertex exactly once.
//!
//! Two independent engines operate on the shared [`WalkTree`] model:
//!
//! - **Rooted DFS** ([`engine::dfs`]): exact post-order evaluation, run once
//!   per candidate root, plus a historical branch-and-bound fast path.
//! - **Message passing** ([`engine::message_passing`]): synchronized
//!   per-directed-edge relaxation rounds that answer all roots at once.
//!
//! The [`engine::compare`] driver runs both over the same tree and checks
//! agreement; it is the only place the engines interact.

#![forbid(unsafe_code)]

pub mod engine;

// Re-export commonly used types
pub use engine::compare::{compare_engines, ComparisonReport, EngineReport};
pub use engine::dfs;
pub use engine::errors::EngineError;
pub use engine::message_passing::{
    self, MessagePassingConfig, MessagePassingDiagnostics,
};
pub use engine::tree::{RootCost, VertexId, WalkTree};
