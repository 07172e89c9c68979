//! The periodic monitor — full-log scans kept off the registration path.
//!
//! Everything here is observational: stale reads, orphaned dependencies,
//! and the replication-lag estimate are logged and reported, never
//! auto-resolved.

use crate::clock::LagProbe;
use crate::oplog::OperationLog;
use crate::registry::RuleRegistry;
use concord_types::{HybridTimestamp, OperationId, OperationKind, RuleId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A read whose observed data exceeded a rule's staleness threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleRead {
    pub operation_id: OperationId,
    pub rule_id: RuleId,
    pub staleness_ms: u64,
    pub threshold_ms: u64,
}

/// An operation declaring a dependency the log has never seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanedOperation {
    pub operation_id: OperationId,
    pub missing_dependency: OperationId,
}

/// The outcome of one monitor tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorReport {
    pub generated_at: HybridTimestamp,
    pub stale_reads: Vec<StaleRead>,
    pub orphaned_operations: Vec<OrphanedOperation>,
    pub replication_lag_ms: u64,
}

/// Scans the log for stale reads and orphaned dependencies, and samples the
/// replication-lag probe.
pub(crate) fn run(
    registry: &RuleRegistry,
    log: &OperationLog,
    lag_probe: &dyn LagProbe,
    now: HybridTimestamp,
) -> MonitorReport {
    let mut stale_reads = Vec::new();

    for op in log.all().filter(|op| op.kind == OperationKind::Read) {
        for rule in registry.rules_for(&op.entity_type) {
            if !rule.requirements.read_consistency {
                continue;
            }
            let Some(threshold) = rule.requirements.staleness_threshold_ms else {
                continue;
            };
            let Some(latest) = log.latest_write(&op.entity_type, &op.entity_id) else {
                continue;
            };
            let staleness = op.timestamp.ms_since(&latest.timestamp);
            if staleness > threshold {
                stale_reads.push(StaleRead {
                    operation_id: op.id,
                    rule_id: rule.id,
                    staleness_ms: staleness,
                    threshold_ms: threshold,
                });
            }
        }
    }

    let orphaned_operations: Vec<OrphanedOperation> = log
        .orphaned_dependencies()
        .into_iter()
        .map(|(operation_id, missing_dependency)| OrphanedOperation {
            operation_id,
            missing_dependency,
        })
        .collect();

    let replication_lag_ms = lag_probe.replication_lag_ms().unwrap_or(0);

    if !orphaned_operations.is_empty() {
        warn!(
            count = orphaned_operations.len(),
            "operations with unresolved dependencies"
        );
    }
    info!(
        stale_reads = stale_reads.len(),
        orphans = orphaned_operations.len(),
        replication_lag_ms,
        "monitor tick"
    );

    MonitorReport {
        generated_at: now,
        stale_reads,
        orphaned_operations,
        replication_lag_ms,
    }
}
