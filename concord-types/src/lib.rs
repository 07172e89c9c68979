//! Core data types for the Concord consistency engine.
//!
//! This crate defines the vocabulary the whole workspace speaks:
//! - Identifier newtypes backed by UUID v7 (time-ordered)
//! - [`HybridTimestamp`] — wall millis plus a logical counter
//! - [`DataOperation`] — a versioned, immutable access record
//! - [`ConsistencyRule`] — a per-entity-type policy
//! - [`ConsistencyViolation`] — a detected breach with a forward-only status
//! - [`ConflictResolution`] — the settled outcome of one violation
//! - [`ConsistencyMetrics`] — a point-in-time health rollup
//!
//! Everything here is pure data: serde-serializable, no locks, no I/O.

mod ids;
mod metrics;
mod operation;
mod resolution;
mod rule;
mod timestamp;
mod violation;

pub use ids::{ActorId, OperationId, ResolutionId, RuleId, SessionId, ViolationId};
pub use metrics::{consistency_score, ConsistencyMetrics};
pub use operation::{ConsistencyModel, DataOperation, OperationDraft, OperationKind};
pub use resolution::ConflictResolution;
pub use rule::{ConsistencyRule, ResolutionStrategy, RuleDraft, RulePatch, RuleRequirements, RuleScope};
pub use timestamp::HybridTimestamp;
pub use violation::{ConsistencyViolation, Severity, ViolationKind, ViolationStatus};
