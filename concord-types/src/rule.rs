//! Consistency rules — named policies bound to one entity type.
//!
//! Rules declare what guarantee a data domain promises and how conflicting
//! writes against it are resolved. Rules are never physically deleted;
//! disabling keeps historical violations pointing at a valid rule.

use crate::{ConsistencyModel, HybridTimestamp, RuleId};
use serde::{Deserialize, Serialize};

/// The set of operations a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// Applies to every operation on the entity type.
    Global,
    /// Applies to operations attributable to a user (actor).
    User,
    /// Applies only to operations carrying a session id.
    Session,
    /// Applies per entity, matched by entity type.
    Entity,
}

/// How conflicting concurrent writes are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// The newest write by timestamp wins.
    LastWriteWins,
    /// The oldest write by timestamp wins.
    FirstWriteWins,
    /// Field-level shallow union in chronological order.
    Merge,
    /// A resolver registered for the entity type decides.
    Custom,
}

/// What a rule requires of reads and writes against its entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRequirements {
    /// Check reads for staleness.
    pub read_consistency: bool,
    /// Check writes for collision-window conflicts.
    pub write_consistency: bool,
    /// Resolution strategy for detected write conflicts.
    pub resolution: ResolutionStrategy,
    /// Staleness tolerance for reads, in milliseconds. `Some(0)` means any
    /// observable delay trips the rule; `None` skips the read check even
    /// when `read_consistency` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staleness_threshold_ms: Option<u64>,
    /// Desired replication factor, when the deployment replicates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<u32>,
}

impl RuleRequirements {
    /// Requirements that check nothing and resolve by last-write-wins.
    #[must_use]
    pub fn none() -> Self {
        Self {
            read_consistency: false,
            write_consistency: false,
            resolution: ResolutionStrategy::LastWriteWins,
            staleness_threshold_ms: None,
            replication_factor: None,
        }
    }
}

/// A named consistency policy bound to one entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyRule {
    /// Unique identifier.
    pub id: RuleId,
    /// Human-readable name.
    pub name: String,
    /// The guarantee this rule promises.
    pub model: ConsistencyModel,
    /// The operations the rule applies to.
    pub scope: RuleScope,
    /// The entity type the rule governs.
    pub entity_type: String,
    /// What the rule checks and how it resolves conflicts.
    pub requirements: RuleRequirements,
    /// Disabled rules are skipped by the detector but kept for audit.
    pub enabled: bool,
    /// When the rule was created.
    pub created_at: HybridTimestamp,
    /// When the rule was last updated.
    pub updated_at: HybridTimestamp,
}

/// Input for creating a rule. Id and timestamps are assigned by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDraft {
    pub name: String,
    pub model: ConsistencyModel,
    pub scope: RuleScope,
    pub entity_type: String,
    pub requirements: RuleRequirements,
    /// Rules are enabled by default unless the draft says otherwise.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RuleDraft {
    /// Creates an enabled draft.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        model: ConsistencyModel,
        scope: RuleScope,
        entity_type: impl Into<String>,
        requirements: RuleRequirements,
    ) -> Self {
        Self {
            name: name.into(),
            model,
            scope,
            entity_type: entity_type.into(),
            requirements,
            enabled: true,
        }
    }

    /// Marks the draft disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Partial update for a rule. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulePatch {
    pub name: Option<String>,
    pub model: Option<ConsistencyModel>,
    pub scope: Option<RuleScope>,
    pub requirements: Option<RuleRequirements>,
    pub enabled: Option<bool>,
}

impl RulePatch {
    /// A patch that only flips the enabled flag.
    #[must_use]
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }
}
