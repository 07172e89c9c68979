use concord_resolve::{chronological, first_write_wins, last_write_wins, shallow_merge};
use concord_types::{ActorId, DataOperation, HybridTimestamp, OperationDraft, OperationKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn make_op(payload: Value, wall: u64, version: u64) -> DataOperation {
    DataOperation::from_draft(
        OperationDraft::new(
            OperationKind::Update,
            "preference",
            "theme",
            payload,
            ActorId::new(),
        ),
        HybridTimestamp::new(wall, 0),
        version,
    )
}

// ── chronological ────────────────────────────────────────────────

#[test]
fn chronological_orders_by_timestamp() {
    let ops = vec![
        make_op(json!({"n": 2}), 200, 2),
        make_op(json!({"n": 1}), 100, 1),
        make_op(json!({"n": 3}), 300, 3),
    ];
    let ordered = chronological(&ops);
    let ns: Vec<i64> = ordered
        .iter()
        .map(|op| op.payload["n"].as_i64().unwrap())
        .collect();
    assert_eq!(ns, vec![1, 2, 3]);
}

#[test]
fn chronological_breaks_timestamp_ties_by_version() {
    let ops = vec![
        make_op(json!({"n": 2}), 100, 5),
        make_op(json!({"n": 1}), 100, 4),
    ];
    let ordered = chronological(&ops);
    assert_eq!(ordered[0].version, 4);
    assert_eq!(ordered[1].version, 5);
}

// ── last / first write wins ──────────────────────────────────────

#[test]
fn last_write_wins_picks_newest() {
    let ops = vec![
        make_op(json!({"value": "old"}), 100, 1),
        make_op(json!({"value": "new"}), 200, 2),
    ];
    let resolved = last_write_wins(&ops).unwrap();
    assert_eq!(resolved.value, json!({"value": "new"}));
}

#[test]
fn first_write_wins_picks_oldest() {
    let ops = vec![
        make_op(json!({"value": "old"}), 100, 1),
        make_op(json!({"value": "new"}), 200, 2),
    ];
    let resolved = first_write_wins(&ops).unwrap();
    assert_eq!(resolved.value, json!({"value": "old"}));
}

#[test]
fn empty_input_is_an_error() {
    assert!(last_write_wins(&[]).is_err());
    assert!(first_write_wins(&[]).is_err());
    assert!(shallow_merge(&[]).is_err());
}

#[test]
fn winner_metadata_names_the_operation() {
    let ops = vec![make_op(json!({"v": 1}), 100, 1)];
    let resolved = last_write_wins(&ops).unwrap();
    assert_eq!(
        resolved.metadata["winning_operation"],
        serde_json::to_value(ops[0].id).unwrap()
    );
}

// ── shallow merge ────────────────────────────────────────────────

#[test]
fn merge_unions_disjoint_fields() {
    let ops = vec![
        make_op(json!({"a": 1}), 100, 1),
        make_op(json!({"b": 2}), 200, 2),
        make_op(json!({"c": 3}), 300, 3),
    ];
    let resolved = shallow_merge(&ops).unwrap();
    assert_eq!(resolved.value, json!({"a": 1, "b": 2, "c": 3}));
}

#[test]
fn merge_later_fields_overwrite_earlier() {
    let ops = vec![
        make_op(json!({"theme": "light", "lang": "en"}), 100, 1),
        make_op(json!({"theme": "dark"}), 200, 2),
    ];
    let resolved = shallow_merge(&ops).unwrap();
    assert_eq!(resolved.value, json!({"theme": "dark", "lang": "en"}));
}

#[test]
fn merge_is_shallow_not_recursive() {
    let ops = vec![
        make_op(json!({"nested": {"a": 1}}), 100, 1),
        make_op(json!({"nested": {"b": 2}}), 200, 2),
    ];
    let resolved = shallow_merge(&ops).unwrap();
    // The whole nested object is replaced, not deep-merged.
    assert_eq!(resolved.value, json!({"nested": {"b": 2}}));
}

#[test]
fn merge_non_object_payload_replaces_accumulated_fields() {
    let ops = vec![
        make_op(json!({"a": 1}), 100, 1),
        make_op(json!("opaque"), 200, 2),
    ];
    let resolved = shallow_merge(&ops).unwrap();
    assert_eq!(resolved.value, json!("opaque"));
}

#[test]
fn merge_object_after_non_object_starts_fresh() {
    let ops = vec![
        make_op(json!("opaque"), 100, 1),
        make_op(json!({"a": 1}), 200, 2),
    ];
    let resolved = shallow_merge(&ops).unwrap();
    assert_eq!(resolved.value, json!({"a": 1}));
}

#[test]
fn merge_is_idempotent() {
    let ops = vec![
        make_op(json!({"a": 1, "b": "x"}), 100, 1),
        make_op(json!({"b": "y", "c": true}), 200, 2),
    ];
    let first = shallow_merge(&ops).unwrap();
    let second = shallow_merge(&ops).unwrap();
    assert_eq!(first.value, second.value);
    assert_eq!(
        serde_json::to_string(&first.value).unwrap(),
        serde_json::to_string(&second.value).unwrap()
    );
}

#[test]
fn merge_ignores_input_slice_order() {
    let a = make_op(json!({"x": 1}), 100, 1);
    let b = make_op(json!({"x": 2}), 200, 2);

    let forward = shallow_merge(&[a.clone(), b.clone()]).unwrap();
    let backward = shallow_merge(&[b, a]).unwrap();
    assert_eq!(forward.value, backward.value);
    assert_eq!(forward.value, json!({"x": 2}));
}
