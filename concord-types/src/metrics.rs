//! Point-in-time consistency metrics.

use crate::HybridTimestamp;
use serde::{Deserialize, Serialize};

/// A rollup snapshot produced by the metrics tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyMetrics {
    /// When the snapshot was taken.
    pub timestamp: HybridTimestamp,
    /// All-time operation count.
    pub total_operations: usize,
    /// Violations detected within the trailing window.
    pub violations_in_window: usize,
    /// Resolutions recorded within the trailing window.
    pub resolutions_in_window: usize,
    /// Mean age of data observed by reads, in milliseconds.
    pub avg_read_staleness_ms: f64,
    /// Replication lag reported by the probe, in milliseconds.
    pub replication_lag_ms: u64,
    /// Derived health score in [0, 1].
    pub consistency_score: f64,
}

/// Derives the consistency score from the violation rate.
///
/// `score = max(0, 1 − 2 × violations / max(1, total))`. Zero operations
/// means no evidence of inconsistency, so the score is 1.
#[must_use]
pub fn consistency_score(violations_in_window: usize, total_operations: usize) -> f64 {
    let rate = violations_in_window as f64 / total_operations.max(1) as f64;
    (1.0 - 2.0 * rate).max(0.0)
}
