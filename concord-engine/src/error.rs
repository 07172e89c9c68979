//! Error types for the engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in engine operations.
///
/// Absence of a rule or violation is not an error — those surface as
/// `bool`/`Option` results, since callers routinely probe for existence.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The operation draft was malformed. This indicates a programming
    /// error upstream, so it fails fast instead of being absorbed.
    #[error("invalid operation: {reason}")]
    InvalidOperation { reason: String },
}

impl EngineError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }
}
