use concord_types::{
    ActorId, ConsistencyModel, DataOperation, HybridTimestamp, OperationDraft, OperationId,
    OperationKind, SessionId,
};
use pretty_assertions::assert_eq;

fn make_draft(kind: OperationKind) -> OperationDraft {
    OperationDraft::new(
        kind,
        "preference",
        "theme",
        serde_json::json!({ "value": "dark" }),
        ActorId::new(),
    )
}

#[test]
fn draft_defaults() {
    let draft = make_draft(OperationKind::Create);
    assert_eq!(draft.consistency, ConsistencyModel::Eventual);
    assert!(draft.session.is_none());
    assert!(draft.dependencies.is_empty());
}

#[test]
fn draft_builders() {
    let session = SessionId::new();
    let dep = OperationId::new();
    let draft = make_draft(OperationKind::Update)
        .with_session(session)
        .with_consistency(ConsistencyModel::Strong)
        .with_dependency(dep);

    assert_eq!(draft.session, Some(session));
    assert_eq!(draft.consistency, ConsistencyModel::Strong);
    assert_eq!(draft.dependencies, vec![dep]);
}

#[test]
fn from_draft_carries_everything() {
    let draft = make_draft(OperationKind::Update);
    let actor = draft.actor;
    let ts = HybridTimestamp::new(1_000, 0);

    let op = DataOperation::from_draft(draft, ts, 7);

    assert_eq!(op.kind, OperationKind::Update);
    assert_eq!(op.entity_type, "preference");
    assert_eq!(op.entity_id, "theme");
    assert_eq!(op.actor, actor);
    assert_eq!(op.timestamp, ts);
    assert_eq!(op.version, 7);
}

#[test]
fn is_write_covers_create_and_update() {
    assert!(OperationKind::Create.is_write());
    assert!(OperationKind::Update.is_write());
    assert!(!OperationKind::Read.is_write());
    assert!(!OperationKind::Delete.is_write());
}

#[test]
fn kind_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&OperationKind::Update).unwrap(),
        "\"update\""
    );
    assert_eq!(
        serde_json::to_string(&ConsistencyModel::BoundedStaleness).unwrap(),
        "\"bounded_staleness\""
    );
}

#[test]
fn operation_serde_roundtrip() {
    let op = DataOperation::from_draft(make_draft(OperationKind::Read), HybridTimestamp::now(), 1);
    let json = serde_json::to_string(&op).unwrap();
    let parsed: DataOperation = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.id, op.id);
    assert_eq!(parsed.version, op.version);
    assert_eq!(parsed.payload, op.payload);
}
