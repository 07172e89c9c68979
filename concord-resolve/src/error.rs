//! Error types for resolution algorithms.

use thiserror::Error;

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors a resolution strategy can produce.
///
/// These are recoverable by the engine: a failed resolution marks its
/// violation `ignored` and processing continues.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No operations were available to resolve from.
    #[error("no operations to resolve from")]
    NoOperations,

    /// The payloads did not have the shape the resolver expects.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A custom resolver failed for its own reasons.
    #[error("resolver failed: {0}")]
    Failed(String),
}
