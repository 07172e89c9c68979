//! Consistency violations — detected breaches of a rule's requirement.
//!
//! A violation's status only moves forward: `detected → resolving →
//! resolved` or `detected → ignored`. The transition methods enforce this;
//! an illegal transition is refused rather than applied.

use crate::{HybridTimestamp, RuleId, ViolationId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of breach a violation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    ReadInconsistency,
    WriteConflict,
    Staleness,
    ReplicationLag,
}

/// How serious a violation is, for triage and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Lifecycle state of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    /// Created by the detector, awaiting resolution.
    Detected,
    /// Claimed by the resolver; guards against double-processing.
    Resolving,
    /// A resolution was recorded.
    Resolved,
    /// Resolution failed or was declined; reason in metadata.
    Ignored,
}

impl ViolationStatus {
    /// Terminal states never transition again.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Ignored)
    }
}

/// A detected breach of a rule's requirement for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyViolation {
    /// Unique identifier.
    pub id: ViolationId,
    /// The rule whose requirement was breached.
    pub rule_id: RuleId,
    /// The data domain of the entity.
    pub entity_type: String,
    /// The entity the breach concerns.
    pub entity_id: String,
    /// The kind of breach.
    pub kind: ViolationKind,
    /// Severity for triage.
    pub severity: Severity,
    /// Human-readable description of what was observed.
    pub description: String,
    /// When the breach was detected.
    pub detected_at: HybridTimestamp,
    /// Set iff status is `Resolved`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<HybridTimestamp>,
    /// Lifecycle state.
    pub status: ViolationStatus,
    /// Algorithm-specific evidence: measured staleness, colliding
    /// operation ids, failure reasons.
    pub metadata: Value,
}

impl ConsistencyViolation {
    /// Creates a violation in the `Detected` state.
    #[must_use]
    pub fn new(
        rule_id: RuleId,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        kind: ViolationKind,
        severity: Severity,
        description: impl Into<String>,
        detected_at: HybridTimestamp,
        metadata: Value,
    ) -> Self {
        Self {
            id: ViolationId::new(),
            rule_id,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            kind,
            severity,
            description: description.into(),
            detected_at,
            resolved_at: None,
            status: ViolationStatus::Detected,
            metadata,
        }
    }

    /// Moves `Detected → Resolving`. Returns false from any other state.
    pub fn begin_resolving(&mut self) -> bool {
        if self.status == ViolationStatus::Detected {
            self.status = ViolationStatus::Resolving;
            true
        } else {
            false
        }
    }

    /// Moves `Resolving → Resolved` and stamps `resolved_at`.
    /// Returns false from any other state.
    pub fn mark_resolved(&mut self, at: HybridTimestamp) -> bool {
        if self.status == ViolationStatus::Resolving {
            self.status = ViolationStatus::Resolved;
            self.resolved_at = Some(at);
            true
        } else {
            false
        }
    }

    /// Moves `Detected | Resolving → Ignored`, recording the reason in
    /// metadata. Returns false from a terminal state.
    pub fn mark_ignored(&mut self, reason: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let reason = reason.into();
        self.status = ViolationStatus::Ignored;
        if let Value::Object(map) = &mut self.metadata {
            map.insert("ignored_reason".into(), Value::String(reason));
        } else {
            self.metadata = serde_json::json!({ "ignored_reason": reason });
        }
        true
    }
}
