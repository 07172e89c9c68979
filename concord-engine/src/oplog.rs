//! The operation log — append-only store of versioned operations.
//!
//! Assigns monotonically increasing per-(entity type, entity id) versions at
//! registration and answers the bounded lookups the detector needs (latest
//! write, writes within a window) without scanning the whole log.

use crate::error::{EngineError, EngineResult};
use concord_types::{DataOperation, HybridTimestamp, OperationDraft, OperationId, OperationKind};
use std::collections::HashMap;

type EntityKey = (String, String);

/// Append-only store of registered operations.
#[derive(Debug, Default)]
pub struct OperationLog {
    ops: HashMap<OperationId, DataOperation>,
    /// Operation ids per entity, in registration order.
    by_entity: HashMap<EntityKey, Vec<OperationId>>,
    /// Highest version assigned per entity. Kept separately from the ops so
    /// pruning old operations never resets version assignment.
    versions: HashMap<EntityKey, u64>,
}

impl OperationLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an operation: validates the draft, assigns the next
    /// version for its entity (first operation gets 1), stores the record,
    /// and returns a copy of it.
    ///
    /// Dependencies referencing ids not yet present are accepted — arrival
    /// order is not guaranteed — and reported later by the monitor.
    pub fn register(
        &mut self,
        draft: OperationDraft,
        timestamp: HybridTimestamp,
    ) -> EngineResult<DataOperation> {
        if draft.entity_type.trim().is_empty() {
            return Err(EngineError::invalid("entity_type must not be empty"));
        }
        if draft.entity_id.trim().is_empty() {
            return Err(EngineError::invalid("entity_id must not be empty"));
        }

        let key = (draft.entity_type.clone(), draft.entity_id.clone());
        let version = self.versions.get(&key).copied().unwrap_or(0) + 1;
        self.versions.insert(key.clone(), version);

        let op = DataOperation::from_draft(draft, timestamp, version);
        self.by_entity.entry(key).or_default().push(op.id);
        self.ops.insert(op.id, op.clone());
        Ok(op)
    }

    /// Looks up an operation by id.
    #[must_use]
    pub fn get(&self, id: &OperationId) -> Option<&DataOperation> {
        self.ops.get(id)
    }

    /// Returns true if the id is present in the log.
    #[must_use]
    pub fn contains(&self, id: &OperationId) -> bool {
        self.ops.contains_key(id)
    }

    /// The most recent `create`/`update` for an entity, by timestamp
    /// (version breaks ties).
    #[must_use]
    pub fn latest_write(&self, entity_type: &str, entity_id: &str) -> Option<&DataOperation> {
        self.entity_ops(entity_type, entity_id)
            .filter(|op| op.kind.is_write())
            .max_by(|a, b| {
                a.timestamp
                    .cmp(&b.timestamp)
                    .then_with(|| a.version.cmp(&b.version))
            })
    }

    /// `update` operations for an entity with `timestamp >= since`,
    /// excluding the given id. Used for collision detection.
    #[must_use]
    pub fn writes_in_window(
        &self,
        entity_type: &str,
        entity_id: &str,
        since: HybridTimestamp,
        exclude: OperationId,
    ) -> Vec<&DataOperation> {
        self.entity_ops(entity_type, entity_id)
            .filter(|op| op.kind == OperationKind::Update)
            .filter(|op| op.timestamp >= since && op.id != exclude)
            .collect()
    }

    /// All `create`/`update` operations for an entity, unordered. The
    /// resolver orders them itself.
    #[must_use]
    pub fn entity_writes(&self, entity_type: &str, entity_id: &str) -> Vec<&DataOperation> {
        self.entity_ops(entity_type, entity_id)
            .filter(|op| op.kind.is_write())
            .collect()
    }

    /// All operations, unordered.
    pub fn all(&self) -> impl Iterator<Item = &DataOperation> {
        self.ops.values()
    }

    /// All operations of one entity type, unordered.
    pub fn by_type<'a>(&'a self, entity_type: &'a str) -> impl Iterator<Item = &'a DataOperation> {
        self.ops
            .values()
            .filter(move |op| op.entity_type == entity_type)
    }

    /// Total number of stored operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if the log holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Declared dependencies that are not present in the log, as
    /// (operation, missing dependency) pairs.
    #[must_use]
    pub fn orphaned_dependencies(&self) -> Vec<(OperationId, OperationId)> {
        let mut orphans = Vec::new();
        for op in self.ops.values() {
            for dep in &op.dependencies {
                if !self.ops.contains_key(dep) {
                    orphans.push((op.id, *dep));
                }
            }
        }
        orphans
    }

    /// Removes operations older than the cutoff. Version counters are
    /// retained, so versions stay strictly increasing across pruning.
    /// Returns the number of operations removed.
    pub fn prune_older_than(&mut self, cutoff: HybridTimestamp) -> usize {
        let doomed: Vec<OperationId> = self
            .ops
            .values()
            .filter(|op| op.timestamp < cutoff)
            .map(|op| op.id)
            .collect();

        for id in &doomed {
            if let Some(op) = self.ops.remove(id) {
                let key = (op.entity_type, op.entity_id);
                if let Some(ids) = self.by_entity.get_mut(&key) {
                    ids.retain(|i| i != id);
                    if ids.is_empty() {
                        self.by_entity.remove(&key);
                    }
                }
            }
        }
        doomed.len()
    }

    fn entity_ops<'a>(
        &'a self,
        entity_type: &str,
        entity_id: &str,
    ) -> impl Iterator<Item = &'a DataOperation> {
        let key = (entity_type.to_string(), entity_id.to_string());
        self.by_entity
            .get(&key)
            .into_iter()
            .flatten()
            .filter_map(|id| self.ops.get(id))
    }
}
