//! Rule storage — add, update, enable/disable, and lookup by entity type.
//!
//! Rules are never physically deleted. Disabling keeps the rule in place so
//! historical violations always point at a rule that still exists.

use concord_types::{
    ConsistencyModel, ConsistencyRule, HybridTimestamp, ResolutionStrategy, RuleDraft, RuleId,
    RulePatch, RuleRequirements, RuleScope,
};
use std::collections::HashMap;

/// Holds the consistency rules the detector evaluates.
#[derive(Debug, Default, Clone)]
pub struct RuleRegistry {
    rules: HashMap<RuleId, ConsistencyRule>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with the default rules for the four data
    /// domains the engine ships with.
    #[must_use]
    pub fn with_defaults(now: HybridTimestamp) -> Self {
        let mut registry = Self::new();
        for draft in default_rules() {
            registry.add_rule(draft, now);
        }
        registry
    }

    /// Adds a rule, assigning its id and timestamps. Returns the id.
    pub fn add_rule(&mut self, draft: RuleDraft, now: HybridTimestamp) -> RuleId {
        let rule = ConsistencyRule {
            id: RuleId::new(),
            name: draft.name,
            model: draft.model,
            scope: draft.scope,
            entity_type: draft.entity_type,
            requirements: draft.requirements,
            enabled: draft.enabled,
            created_at: now,
            updated_at: now,
        };
        let id = rule.id;
        self.rules.insert(id, rule);
        id
    }

    /// Merges the present fields of a patch into a rule and bumps
    /// `updated_at`. Returns false if the rule id is unknown.
    pub fn update_rule(&mut self, id: RuleId, patch: RulePatch, now: HybridTimestamp) -> bool {
        let Some(rule) = self.rules.get_mut(&id) else {
            return false;
        };
        if let Some(name) = patch.name {
            rule.name = name;
        }
        if let Some(model) = patch.model {
            rule.model = model;
        }
        if let Some(scope) = patch.scope {
            rule.scope = scope;
        }
        if let Some(requirements) = patch.requirements {
            rule.requirements = requirements;
        }
        if let Some(enabled) = patch.enabled {
            rule.enabled = enabled;
        }
        rule.updated_at = now;
        true
    }

    /// Enables or disables a rule. Returns false if the id is unknown.
    pub fn set_enabled(&mut self, id: RuleId, enabled: bool, now: HybridTimestamp) -> bool {
        self.update_rule(id, RulePatch::enabled(enabled), now)
    }

    /// Looks up a rule by id, enabled or not.
    #[must_use]
    pub fn get(&self, id: &RuleId) -> Option<&ConsistencyRule> {
        self.rules.get(id)
    }

    /// All enabled rules governing an entity type.
    #[must_use]
    pub fn rules_for(&self, entity_type: &str) -> Vec<&ConsistencyRule> {
        self.rules
            .values()
            .filter(|rule| rule.enabled && rule.entity_type == entity_type)
            .collect()
    }

    /// All rules, for the statistics surface.
    pub fn all(&self) -> impl Iterator<Item = &ConsistencyRule> {
        self.rules.values()
    }

    /// Number of rules, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The default rules for the four data domains.
///
/// Preference and session memory resolve through their custom resolvers;
/// patterns merge via their custom resolver; system metrics tolerate
/// 5 seconds of staleness and resolve by recency.
fn default_rules() -> Vec<RuleDraft> {
    vec![
        RuleDraft::new(
            "preference-consistency",
            ConsistencyModel::Strong,
            RuleScope::User,
            "preference",
            RuleRequirements {
                read_consistency: true,
                write_consistency: true,
                resolution: ResolutionStrategy::Custom,
                staleness_threshold_ms: Some(0),
                replication_factor: None,
            },
        ),
        RuleDraft::new(
            "session-memory-consistency",
            ConsistencyModel::Session,
            RuleScope::Session,
            "session_memory",
            RuleRequirements {
                read_consistency: false,
                write_consistency: true,
                resolution: ResolutionStrategy::Custom,
                staleness_threshold_ms: None,
                replication_factor: None,
            },
        ),
        RuleDraft::new(
            "pattern-consistency",
            ConsistencyModel::Eventual,
            RuleScope::Global,
            "pattern",
            RuleRequirements {
                read_consistency: false,
                write_consistency: true,
                resolution: ResolutionStrategy::Custom,
                staleness_threshold_ms: None,
                replication_factor: None,
            },
        ),
        RuleDraft::new(
            "metric-staleness",
            ConsistencyModel::BoundedStaleness,
            RuleScope::Global,
            "metric",
            RuleRequirements {
                read_consistency: true,
                write_consistency: false,
                resolution: ResolutionStrategy::LastWriteWins,
                staleness_threshold_ms: Some(5_000),
                replication_factor: None,
            },
        ),
    ]
}
