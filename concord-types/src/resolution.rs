//! Conflict resolutions — the outcome of resolving one violation.

use crate::{HybridTimestamp, ResolutionId, ResolutionStrategy, ViolationId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome of resolving one violation. Exactly one exists per resolved
/// violation; immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResolution {
    /// Unique identifier.
    pub id: ResolutionId,
    /// The violation this resolution settles.
    pub violation_id: ViolationId,
    /// The strategy that produced the value.
    pub strategy: ResolutionStrategy,
    /// The winning or merged value.
    pub value: Value,
    /// Identity of the resolver (service name or actor).
    pub resolved_by: String,
    /// When the resolution was recorded.
    pub resolved_at: HybridTimestamp,
    /// Confidence in the outcome, bounded to [0, 1].
    pub confidence: f64,
    /// Strategy-specific detail (contributing operation ids, etc.).
    pub metadata: Value,
}

impl ConflictResolution {
    /// Creates a resolution record, clamping confidence into [0, 1].
    #[must_use]
    pub fn new(
        violation_id: ViolationId,
        strategy: ResolutionStrategy,
        value: Value,
        resolved_by: impl Into<String>,
        resolved_at: HybridTimestamp,
        confidence: f64,
        metadata: Value,
    ) -> Self {
        Self {
            id: ResolutionId::new(),
            violation_id,
            strategy,
            value,
            resolved_by: resolved_by.into(),
            resolved_at,
            confidence: confidence.clamp(0.0, 1.0),
            metadata,
        }
    }
}
