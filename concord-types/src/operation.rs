//! Versioned data operations.
//!
//! A `DataOperation` is an immutable fact: "this actor performed this kind of
//! access to this entity at this time." Operations are the unit the detector,
//! resolver, and aggregator all work from. The operation log assigns each one
//! a per-entity version at registration; the record never changes afterward.

use crate::{ActorId, HybridTimestamp, OperationId, SessionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of access an operation represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
}

impl OperationKind {
    /// Returns true for operations that produce a new entity state.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

/// The consistency guarantee a data domain declares for its operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyModel {
    /// Every read observes the latest committed write.
    Strong,
    /// Reads may lag writes; replicas converge eventually.
    Eventual,
    /// Reads respect the happens-before order of their dependencies.
    Causal,
    /// Guarantees hold within a single session only.
    Session,
    /// Reads may lag writes by at most a configured staleness bound.
    BoundedStaleness,
}

/// Caller-facing input for registering an operation.
///
/// The operation log turns a draft into a full [`DataOperation`] by assigning
/// an id and a per-entity version. Drafts carry no version on purpose —
/// versions exist only inside the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDraft {
    /// The kind of access.
    pub kind: OperationKind,
    /// The data domain this operation touches (e.g. "preference").
    pub entity_type: String,
    /// The entity within the domain.
    pub entity_id: String,
    /// Operation payload. Structure is domain-defined.
    pub payload: Value,
    /// The actor performing the access.
    pub actor: ActorId,
    /// The session the access belongs to, when any.
    pub session: Option<SessionId>,
    /// The consistency level the caller declared for this access.
    pub consistency: ConsistencyModel,
    /// Operations that must precede this one. Order of arrival is not
    /// guaranteed; unknown ids are accepted and flagged by the monitor.
    pub dependencies: Vec<OperationId>,
}

impl OperationDraft {
    /// Creates a draft with no session, no dependencies, and an eventual
    /// consistency declaration.
    #[must_use]
    pub fn new(
        kind: OperationKind,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        payload: Value,
        actor: ActorId,
    ) -> Self {
        Self {
            kind,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            payload,
            actor,
            session: None,
            consistency: ConsistencyModel::Eventual,
            dependencies: Vec::new(),
        }
    }

    /// Sets the session id.
    #[must_use]
    pub fn with_session(mut self, session: SessionId) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the declared consistency level.
    #[must_use]
    pub fn with_consistency(mut self, consistency: ConsistencyModel) -> Self {
        self.consistency = consistency;
        self
    }

    /// Adds a dependency on a prior operation.
    #[must_use]
    pub fn with_dependency(mut self, dep: OperationId) -> Self {
        self.dependencies.push(dep);
        self
    }
}

/// A registered, versioned operation.
///
/// Immutable once stored. The version is strictly increasing per
/// (entity type, entity id) and assigned exactly once by the operation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataOperation {
    /// Unique identifier for this operation.
    pub id: OperationId,
    /// The kind of access.
    pub kind: OperationKind,
    /// The data domain this operation touches.
    pub entity_type: String,
    /// The entity within the domain.
    pub entity_id: String,
    /// Operation payload.
    pub payload: Value,
    /// When the operation was registered.
    pub timestamp: HybridTimestamp,
    /// The actor performing the access.
    pub actor: ActorId,
    /// The session the access belongs to, when any.
    pub session: Option<SessionId>,
    /// The consistency level the caller declared.
    pub consistency: ConsistencyModel,
    /// Per-entity version, starting at 1 for the first operation.
    pub version: u64,
    /// Declared dependency operations.
    #[serde(default)]
    pub dependencies: Vec<OperationId>,
}

impl DataOperation {
    /// Materializes a draft into a stored operation.
    #[must_use]
    pub fn from_draft(draft: OperationDraft, timestamp: HybridTimestamp, version: u64) -> Self {
        Self {
            id: OperationId::new(),
            kind: draft.kind,
            entity_type: draft.entity_type,
            entity_id: draft.entity_id,
            payload: draft.payload,
            timestamp,
            actor: draft.actor,
            session: draft.session,
            consistency: draft.consistency,
            version,
            dependencies: draft.dependencies,
        }
    }
}
