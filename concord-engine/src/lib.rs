//! Multi-model consistency and conflict-resolution engine.
//!
//! Concord lets independent data domains each declare a consistency
//! guarantee, records every read and write against them as versioned
//! operations, detects when a domain's guarantee is violated, and resolves
//! conflicting concurrent writes with a per-domain strategy — all as an
//! embedded, in-process library over operations some other component is
//! already executing against a data store.
//!
//! # Architecture
//!
//! - **Rule registry**: per-entity-type policies (model, scope, checks,
//!   resolution strategy)
//! - **Operation log**: append-only, assigns per-entity versions at
//!   registration
//! - **Detector**: runs synchronously on the registration path — staleness
//!   for reads, collision windows for writes
//! - **Resolver**: drains detected violations through built-in or custom
//!   strategies, with confidence scoring
//! - **Metrics**: windowed rollups with a derived consistency score
//! - **Scheduler**: three independent periodic ticks (monitor, resolve,
//!   metrics) with clean shutdown
//!
//! # Example
//!
//! ```
//! use concord_engine::{ConsistencyEngine, EngineConfig};
//! use concord_types::{ActorId, OperationDraft, OperationKind};
//!
//! let engine = ConsistencyEngine::new(EngineConfig::default());
//! let actor = ActorId::new();
//!
//! let draft = OperationDraft::new(
//!     OperationKind::Create,
//!     "preference",
//!     "theme",
//!     serde_json::json!({ "value": "dark", "source": "explicit" }),
//!     actor,
//! );
//! let op_id = engine.register_operation(draft).unwrap();
//! assert!(engine.operation(&op_id).is_some());
//! ```

mod clock;
mod config;
mod detector;
mod engine;
mod error;
mod metrics;
mod monitor;
mod oplog;
mod registry;
mod resolver;
mod scheduler;

pub use clock::{Clock, LagProbe, ManualClock, NoLagProbe, SystemClock};
pub use config::EngineConfig;
pub use engine::{ConsistencyEngine, EngineStatistics};
pub use error::{EngineError, EngineResult};
pub use monitor::{MonitorReport, OrphanedOperation, StaleRead};
pub use oplog::OperationLog;
pub use registry::RuleRegistry;
pub use scheduler::Scheduler;
