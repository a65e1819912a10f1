//! Error types for walkroot engines.

use thiserror::Error;

/// Errors that can occur while building a tree or running an engine.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes. All public APIs return
/// `Result<T, EngineError>` to avoid panics in library code.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    /// An engine was invoked with zero vertices. Always surfaced to the
    /// caller; engines perform no partial computation in this case.
    #[error("empty graph: {0}")]
    EmptyGraph(String),

    /// Invalid input while constructing a tree or configuring an engine
    /// (e.g. negative weight, duplicate vertex id, bad tolerance).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Internal engine error (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}
