use concord_engine::RuleRegistry;
use concord_types::{
    ConsistencyModel, HybridTimestamp, ResolutionStrategy, RuleDraft, RuleId, RulePatch,
    RuleRequirements, RuleScope,
};
use pretty_assertions::assert_eq;

fn make_draft(name: &str, entity_type: &str) -> RuleDraft {
    RuleDraft::new(
        name,
        ConsistencyModel::Eventual,
        RuleScope::Global,
        entity_type,
        RuleRequirements::none(),
    )
}

fn ts(wall: u64) -> HybridTimestamp {
    HybridTimestamp::new(wall, 0)
}

// ── add / get ────────────────────────────────────────────────────

#[test]
fn add_rule_assigns_id_and_timestamps() {
    let mut registry = RuleRegistry::new();
    let id = registry.add_rule(make_draft("docs", "document"), ts(100));

    let rule = registry.get(&id).unwrap();
    assert_eq!(rule.name, "docs");
    assert_eq!(rule.created_at, ts(100));
    assert_eq!(rule.updated_at, ts(100));
    assert!(rule.enabled);
}

#[test]
fn get_unknown_id_is_none() {
    let registry = RuleRegistry::new();
    assert!(registry.get(&RuleId::new()).is_none());
}

// ── update ───────────────────────────────────────────────────────

#[test]
fn update_merges_present_fields_and_bumps_updated_at() {
    let mut registry = RuleRegistry::new();
    let id = registry.add_rule(make_draft("docs", "document"), ts(100));

    let patch = RulePatch {
        name: Some("documents".to_string()),
        requirements: Some(RuleRequirements {
            read_consistency: true,
            write_consistency: true,
            resolution: ResolutionStrategy::Merge,
            staleness_threshold_ms: Some(2_000),
            replication_factor: None,
        }),
        ..RulePatch::default()
    };
    assert!(registry.update_rule(id, patch, ts(500)));

    let rule = registry.get(&id).unwrap();
    assert_eq!(rule.name, "documents");
    assert_eq!(rule.requirements.resolution, ResolutionStrategy::Merge);
    // Untouched fields survive.
    assert_eq!(rule.model, ConsistencyModel::Eventual);
    assert_eq!(rule.entity_type, "document");
    assert_eq!(rule.created_at, ts(100));
    assert_eq!(rule.updated_at, ts(500));
}

#[test]
fn update_unknown_id_returns_false_and_changes_nothing() {
    let mut registry = RuleRegistry::new();
    let id = registry.add_rule(make_draft("docs", "document"), ts(100));

    let untouched_before: Vec<_> = registry.all().cloned().collect();
    assert!(!registry.update_rule(RuleId::new(), RulePatch::enabled(false), ts(500)));

    let untouched_after: Vec<_> = registry.all().cloned().collect();
    assert_eq!(untouched_before.len(), untouched_after.len());
    assert!(registry.get(&id).unwrap().enabled);
    assert_eq!(registry.get(&id).unwrap().updated_at, ts(100));
}

// ── enable / disable ─────────────────────────────────────────────

#[test]
fn set_enabled_toggles_and_reports_unknown() {
    let mut registry = RuleRegistry::new();
    let id = registry.add_rule(make_draft("docs", "document"), ts(100));

    assert!(registry.set_enabled(id, false, ts(200)));
    assert!(!registry.get(&id).unwrap().enabled);

    assert!(registry.set_enabled(id, true, ts(300)));
    assert!(registry.get(&id).unwrap().enabled);

    assert!(!registry.set_enabled(RuleId::new(), false, ts(400)));
}

// ── rules_for ────────────────────────────────────────────────────

#[test]
fn rules_for_returns_enabled_matching_rules_only() {
    let mut registry = RuleRegistry::new();
    let keep = registry.add_rule(make_draft("docs-a", "document"), ts(100));
    let disabled = registry.add_rule(make_draft("docs-b", "document"), ts(100));
    registry.add_rule(make_draft("prefs", "preference"), ts(100));
    registry.set_enabled(disabled, false, ts(200));

    let matching = registry.rules_for("document");
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, keep);
}

#[test]
fn disabled_rules_are_retained_not_deleted() {
    let mut registry = RuleRegistry::new();
    let id = registry.add_rule(make_draft("docs", "document"), ts(100));
    registry.set_enabled(id, false, ts(200));

    // Still resolvable by id for historical violations.
    assert!(registry.get(&id).is_some());
    assert_eq!(registry.len(), 1);
}

// ── defaults ─────────────────────────────────────────────────────

#[test]
fn default_rules_cover_the_four_domains() {
    let registry = RuleRegistry::with_defaults(ts(100));
    assert_eq!(registry.len(), 4);

    assert_eq!(registry.rules_for("preference").len(), 1);
    assert_eq!(registry.rules_for("session_memory").len(), 1);
    assert_eq!(registry.rules_for("pattern").len(), 1);
    assert_eq!(registry.rules_for("metric").len(), 1);

    let pref = registry.rules_for("preference")[0];
    assert_eq!(pref.model, ConsistencyModel::Strong);
    assert_eq!(pref.requirements.resolution, ResolutionStrategy::Custom);
    assert!(pref.requirements.write_consistency);

    let metric = registry.rules_for("metric")[0];
    assert_eq!(metric.model, ConsistencyModel::BoundedStaleness);
    assert_eq!(metric.requirements.staleness_threshold_ms, Some(5_000));
}
