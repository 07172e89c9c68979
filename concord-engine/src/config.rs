//! Engine configuration.

use std::time::Duration;

/// Configuration for the consistency engine and its periodic tasks.
///
/// The detection constants (collision window, staleness severity boundary)
/// are deployment policy, not physical laws — the defaults match the
/// reference deployment and every one is overridable per instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How often the monitor tick scans for staleness, lag, and orphans.
    pub monitor_interval: Duration,
    /// How often the resolve tick drains unresolved violations.
    pub resolve_interval: Duration,
    /// How often the metrics tick emits a snapshot.
    pub metrics_interval: Duration,
    /// Two writes within this window count as concurrent (ms).
    pub collision_window_ms: u64,
    /// Staleness above this is `high` severity rather than `medium` (ms).
    pub staleness_high_ms: u64,
    /// Trailing window for violation/resolution counts in snapshots (ms).
    pub metrics_window_ms: u64,
    /// Snapshots older than this are pruned from history (ms).
    pub metrics_retention_ms: u64,
    /// Cap on violations processed per resolve tick; the remainder waits
    /// for the next tick so a large backlog cannot stall the scheduler.
    pub max_resolutions_per_tick: usize,
    /// Operations older than this horizon are pruned by the metrics tick's
    /// housekeeping. `None` keeps everything in memory.
    pub operation_retention_ms: Option<u64>,
    /// Identity recorded as `resolved_by` on resolution records.
    pub resolver_identity: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            monitor_interval: Duration::from_secs(30),
            resolve_interval: Duration::from_secs(120),
            metrics_interval: Duration::from_secs(300),
            collision_window_ms: 5_000,
            staleness_high_ms: 30_000,
            metrics_window_ms: 300_000,
            metrics_retention_ms: 86_400_000,
            max_resolutions_per_tick: 64,
            operation_retention_ms: None,
            resolver_identity: "concord-resolver".to_string(),
        }
    }
}
