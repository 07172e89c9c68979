use concord_resolve::{
    EntityResolver, PatternResolver, PreferenceResolver, ResolverRegistry, SessionMemoryResolver,
};
use concord_types::{
    ActorId, ConsistencyViolation, DataOperation, HybridTimestamp, OperationDraft, OperationKind,
    RuleId, Severity, ViolationKind,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn make_op(entity_type: &str, payload: Value, wall: u64, version: u64) -> DataOperation {
    DataOperation::from_draft(
        OperationDraft::new(
            OperationKind::Update,
            entity_type,
            "e-1",
            payload,
            ActorId::new(),
        ),
        HybridTimestamp::new(wall, 0),
        version,
    )
}

fn make_violation(entity_type: &str) -> ConsistencyViolation {
    ConsistencyViolation::new(
        RuleId::new(),
        entity_type,
        "e-1",
        ViolationKind::WriteConflict,
        Severity::High,
        "conflict",
        HybridTimestamp::new(1_000, 0),
        json!({}),
    )
}

// ── PreferenceResolver ───────────────────────────────────────────

#[test]
fn explicit_preference_beats_newer_inferred() {
    let ops = vec![
        make_op(
            "preference",
            json!({"value": "dark", "source": "explicit"}),
            100,
            1,
        ),
        make_op(
            "preference",
            json!({"value": "light", "source": "inferred"}),
            200,
            2,
        ),
    ];
    let resolved = PreferenceResolver
        .resolve(&make_violation("preference"), &ops)
        .unwrap();
    assert_eq!(resolved.value["value"], json!("dark"));
    assert_eq!(resolved.confidence, Some(0.95));
    assert_eq!(resolved.metadata["explicit_candidates"], json!(1));
}

#[test]
fn newest_explicit_wins_among_several() {
    let ops = vec![
        make_op(
            "preference",
            json!({"value": "dark", "source": "explicit"}),
            100,
            1,
        ),
        make_op(
            "preference",
            json!({"value": "sepia", "source": "explicit"}),
            300,
            3,
        ),
        make_op(
            "preference",
            json!({"value": "light", "source": "inferred"}),
            200,
            2,
        ),
    ];
    let resolved = PreferenceResolver
        .resolve(&make_violation("preference"), &ops)
        .unwrap();
    assert_eq!(resolved.value["value"], json!("sepia"));
}

#[test]
fn all_inferred_falls_back_to_recency() {
    let ops = vec![
        make_op(
            "preference",
            json!({"value": "dark", "source": "inferred"}),
            100,
            1,
        ),
        make_op(
            "preference",
            json!({"value": "light", "source": "inferred"}),
            200,
            2,
        ),
    ];
    let resolved = PreferenceResolver
        .resolve(&make_violation("preference"), &ops)
        .unwrap();
    assert_eq!(resolved.value["value"], json!("light"));
    assert_eq!(resolved.confidence, None);
}

#[test]
fn preference_with_no_operations_errors() {
    assert!(PreferenceResolver
        .resolve(&make_violation("preference"), &[])
        .is_err());
}

// ── SessionMemoryResolver ────────────────────────────────────────

#[test]
fn messages_concatenate_chronologically() {
    let ops = vec![
        make_op(
            "session_memory",
            json!({"messages": [{"role": "assistant", "text": "hi"}]}),
            200,
            2,
        ),
        make_op(
            "session_memory",
            json!({"messages": [{"role": "user", "text": "hello"}]}),
            100,
            1,
        ),
    ];
    let resolved = SessionMemoryResolver
        .resolve(&make_violation("session_memory"), &ops)
        .unwrap();

    let messages = resolved.value["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], json!("user"));
    assert_eq!(messages[1]["role"], json!("assistant"));
}

#[test]
fn context_and_metadata_maps_merge_with_later_winning() {
    let ops = vec![
        make_op(
            "session_memory",
            json!({"context": {"topic": "rust", "mood": "curious"}, "metadata": {"a": 1}}),
            100,
            1,
        ),
        make_op(
            "session_memory",
            json!({"context": {"topic": "tokio"}, "metadata": {"b": 2}}),
            200,
            2,
        ),
    ];
    let resolved = SessionMemoryResolver
        .resolve(&make_violation("session_memory"), &ops)
        .unwrap();

    assert_eq!(resolved.value["context"]["topic"], json!("tokio"));
    assert_eq!(resolved.value["context"]["mood"], json!("curious"));
    assert_eq!(resolved.value["metadata"]["a"], json!(1));
    assert_eq!(resolved.value["metadata"]["b"], json!(2));
}

#[test]
fn session_memory_tolerates_missing_fields() {
    let ops = vec![make_op("session_memory", json!({"unrelated": true}), 100, 1)];
    let resolved = SessionMemoryResolver
        .resolve(&make_violation("session_memory"), &ops)
        .unwrap();
    assert_eq!(resolved.value["messages"], json!([]));
    assert_eq!(resolved.value["context"], json!({}));
}

// ── PatternResolver ──────────────────────────────────────────────

#[test]
fn patterns_concatenate_and_confidence_averages() {
    let ops = vec![
        make_op(
            "pattern",
            json!({"patterns": ["morning-reader"], "confidence": 0.8}),
            100,
            1,
        ),
        make_op(
            "pattern",
            json!({"patterns": ["dark-mode-at-night"], "confidence": 0.4}),
            200,
            2,
        ),
    ];
    let resolved = PatternResolver
        .resolve(&make_violation("pattern"), &ops)
        .unwrap();

    let patterns = resolved.value["patterns"].as_array().unwrap();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0], json!("morning-reader"));

    let confidence = resolved.value["confidence"].as_f64().unwrap();
    assert!((confidence - 0.6).abs() < 1e-9);
    assert_eq!(resolved.confidence, Some(confidence));
}

#[test]
fn pattern_without_confidence_values_omits_the_field() {
    let ops = vec![make_op("pattern", json!({"patterns": ["x"]}), 100, 1)];
    let resolved = PatternResolver
        .resolve(&make_violation("pattern"), &ops)
        .unwrap();
    assert!(resolved.value.get("confidence").is_none());
    assert_eq!(resolved.confidence, None);
}

// ── ResolverRegistry ─────────────────────────────────────────────

#[test]
fn default_registry_covers_the_three_domains() {
    let registry = ResolverRegistry::with_defaults();
    assert_eq!(registry.entity_types().count(), 3);
    assert!(registry.get("preference").is_some());
    assert!(registry.get("session_memory").is_some());
    assert!(registry.get("pattern").is_some());
    assert!(registry.get("metric").is_none());
}

#[test]
fn registering_replaces_existing_resolver() {
    struct AlwaysFirst;
    impl EntityResolver for AlwaysFirst {
        fn resolve(
            &self,
            _violation: &ConsistencyViolation,
            ops: &[DataOperation],
        ) -> concord_resolve::ResolveResult<concord_resolve::Resolved> {
            concord_resolve::first_write_wins(ops)
        }
    }

    let mut registry = ResolverRegistry::with_defaults();
    registry.register("preference", std::sync::Arc::new(AlwaysFirst));

    let ops = vec![
        make_op("preference", json!({"value": "old"}), 100, 1),
        make_op("preference", json!({"value": "new"}), 200, 2),
    ];
    let resolved = registry
        .get("preference")
        .unwrap()
        .resolve(&make_violation("preference"), &ops)
        .unwrap();
    assert_eq!(resolved.value, json!({"value": "old"}));
}
