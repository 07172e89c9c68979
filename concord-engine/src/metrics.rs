//! Metrics aggregation — windowed rollups of engine state.
//!
//! A pure read-and-compute step. It tolerates running concurrently with
//! registration (the numbers describe a moving target, not a transaction).

use crate::clock::LagProbe;
use crate::config::EngineConfig;
use crate::oplog::OperationLog;
use concord_types::{
    consistency_score, ConflictResolution, ConsistencyMetrics, ConsistencyViolation,
    HybridTimestamp, OperationKind, ViolationId,
};
use std::collections::HashMap;

/// Computes a snapshot over the trailing metrics window.
pub(crate) fn snapshot(
    config: &EngineConfig,
    log: &OperationLog,
    violations: &HashMap<ViolationId, ConsistencyViolation>,
    resolutions: &HashMap<ViolationId, ConflictResolution>,
    lag_probe: &dyn LagProbe,
    now: HybridTimestamp,
) -> ConsistencyMetrics {
    let window_start = now.minus_ms(config.metrics_window_ms);

    let violations_in_window = violations
        .values()
        .filter(|v| v.detected_at >= window_start)
        .count();
    let resolutions_in_window = resolutions
        .values()
        .filter(|r| r.resolved_at >= window_start)
        .count();

    // How old is the data callers are currently seeing: mean age of every
    // read, measured from now rather than per-read latest-write deltas.
    let read_ages: Vec<u64> = log
        .all()
        .filter(|op| op.kind == OperationKind::Read)
        .map(|op| now.ms_since(&op.timestamp))
        .collect();
    let avg_read_staleness_ms = if read_ages.is_empty() {
        0.0
    } else {
        read_ages.iter().sum::<u64>() as f64 / read_ages.len() as f64
    };

    ConsistencyMetrics {
        timestamp: now,
        total_operations: log.len(),
        violations_in_window,
        resolutions_in_window,
        avg_read_staleness_ms,
        replication_lag_ms: lag_probe.replication_lag_ms().unwrap_or(0),
        consistency_score: consistency_score(violations_in_window, log.len()),
    }
}

/// Drops snapshots that have aged out of the retention window.
pub(crate) fn prune_history(
    history: &mut Vec<ConsistencyMetrics>,
    retention_ms: u64,
    now: HybridTimestamp,
) {
    let cutoff = now.minus_ms(retention_ms);
    history.retain(|m| m.timestamp >= cutoff);
}
