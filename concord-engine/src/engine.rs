//! The engine facade — owns all mutable state behind one lock.
//!
//! One explicitly constructed instance per process (or per test). All state
//! lives in the instance; there is no global. `register_operation` runs
//! synchronously on the calling thread, so callers observe the assigned
//! version before they proceed. The periodic ticks take the same lock,
//! which is the whole concurrency discipline: a coarse lock is plenty for a
//! policy/observability layer that is nowhere near a hot data path.

use crate::clock::{Clock, LagProbe, NoLagProbe, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::metrics;
use crate::monitor::{self, MonitorReport};
use crate::oplog::OperationLog;
use crate::registry::RuleRegistry;
use crate::{detector, resolver};
use concord_resolve::{EntityResolver, ResolverRegistry};
use concord_types::{
    consistency_score, ConflictResolution, ConsistencyMetrics, ConsistencyRule,
    ConsistencyViolation, HybridTimestamp, OperationDraft, OperationId, RuleDraft, RuleId,
    RulePatch, ViolationId,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Everything `getStatistics` exposes, cloned out of the engine state.
#[derive(Debug, Clone)]
pub struct EngineStatistics {
    pub rules: Vec<ConsistencyRule>,
    pub violations: Vec<ConsistencyViolation>,
    pub resolutions: Vec<ConflictResolution>,
    pub metrics_history: Vec<ConsistencyMetrics>,
    /// The consistency score as of now, derived live rather than from the
    /// last snapshot.
    pub overall_score: f64,
}

/// All shared mutable state, guarded together.
struct EngineState {
    rules: RuleRegistry,
    log: OperationLog,
    violations: HashMap<ViolationId, ConsistencyViolation>,
    resolutions: HashMap<ViolationId, ConflictResolution>,
    metrics_history: Vec<ConsistencyMetrics>,
    /// Last stamp handed out, so operation timestamps are strictly
    /// increasing even if the clock stalls.
    last_stamp: HybridTimestamp,
}

impl EngineState {
    fn next_stamp(&mut self, clock: &dyn Clock) -> HybridTimestamp {
        let now = clock.now();
        let stamp = if now > self.last_stamp {
            now
        } else {
            self.last_stamp.succ()
        };
        self.last_stamp = stamp;
        stamp
    }
}

/// The multi-model consistency and conflict-resolution engine.
///
/// Construct one, optionally register extra rules and custom resolvers,
/// then either drive the ticks yourself (`resolve_pending`, `run_monitor`,
/// `snapshot_metrics`) or hand the engine to a
/// [`Scheduler`](crate::Scheduler).
pub struct ConsistencyEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    lag_probe: Arc<dyn LagProbe>,
    resolvers: RwLock<ResolverRegistry>,
    state: RwLock<EngineState>,
}

impl ConsistencyEngine {
    /// Creates an engine with the system clock, no replication-lag signal,
    /// the default domain rules, and the default domain resolvers.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock), Arc::new(NoLagProbe))
    }

    /// Creates an engine with explicit time and lag sources. Tests use a
    /// [`ManualClock`](crate::ManualClock) here to drive windows without
    /// waiting on wall time.
    #[must_use]
    pub fn with_clock(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        lag_probe: Arc<dyn LagProbe>,
    ) -> Self {
        let now = clock.now();
        Self {
            config,
            clock,
            lag_probe,
            resolvers: RwLock::new(ResolverRegistry::with_defaults()),
            state: RwLock::new(EngineState {
                rules: RuleRegistry::with_defaults(now),
                log: OperationLog::new(),
                violations: HashMap::new(),
                resolutions: HashMap::new(),
                metrics_history: Vec::new(),
                last_stamp: now,
            }),
        }
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Operations ───────────────────────────────────────────────

    /// Registers an operation: assigns its version, stores it, and runs
    /// violation detection synchronously. Returns the operation id.
    ///
    /// The only error is a malformed draft (empty entity type/id) — a
    /// programming error upstream, surfaced loudly.
    pub fn register_operation(&self, draft: OperationDraft) -> EngineResult<OperationId> {
        let mut state = self.state.write().unwrap();
        let stamp = state.next_stamp(self.clock.as_ref());
        let op = state.log.register(draft, stamp)?;

        let found = detector::detect(&self.config, &state.rules, &state.log, &op);
        for violation in found {
            info!(
                violation = %violation.id,
                kind = ?violation.kind,
                severity = ?violation.severity,
                entity_type = %violation.entity_type,
                entity_id = %violation.entity_id,
                "consistency violation detected"
            );
            state.violations.insert(violation.id, violation);
        }

        Ok(op.id)
    }

    /// Looks up a registered operation.
    #[must_use]
    pub fn operation(&self, id: &OperationId) -> Option<concord_types::DataOperation> {
        self.state.read().unwrap().log.get(id).cloned()
    }

    // ── Rules ────────────────────────────────────────────────────

    /// Adds a rule. Returns its id.
    pub fn add_rule(&self, draft: RuleDraft) -> RuleId {
        let mut state = self.state.write().unwrap();
        let now = state.next_stamp(self.clock.as_ref());
        state.rules.add_rule(draft, now)
    }

    /// Applies a partial update to a rule. Returns false for an unknown id.
    pub fn update_rule(&self, id: RuleId, patch: RulePatch) -> bool {
        let mut state = self.state.write().unwrap();
        let now = state.next_stamp(self.clock.as_ref());
        state.rules.update_rule(id, patch, now)
    }

    /// Enables or disables a rule. Returns false for an unknown id.
    pub fn set_rule_enabled(&self, id: RuleId, enabled: bool) -> bool {
        let mut state = self.state.write().unwrap();
        let now = state.next_stamp(self.clock.as_ref());
        state.rules.set_enabled(id, enabled, now)
    }

    // ── Resolvers ────────────────────────────────────────────────

    /// Registers a custom resolver for an entity type, replacing any
    /// existing one. New domains plug in here without engine changes.
    pub fn register_resolver(
        &self,
        entity_type: impl Into<String>,
        resolver: Arc<dyn EntityResolver>,
    ) {
        self.resolvers
            .write()
            .unwrap()
            .register(entity_type, resolver);
    }

    // ── Periodic work (also callable directly) ───────────────────

    /// Resolves pending violations. The resolve tick calls this; tests and
    /// embedders may call it directly.
    pub fn resolve_pending(&self) -> Vec<ConflictResolution> {
        let resolvers = self.resolvers.read().unwrap();
        let mut state = self.state.write().unwrap();
        let now = state.next_stamp(self.clock.as_ref());
        let EngineState {
            rules,
            log,
            violations,
            resolutions,
            ..
        } = &mut *state;

        resolver::resolve_pending(
            &self.config,
            rules,
            log,
            &resolvers,
            violations,
            resolutions,
            now,
        )
    }

    /// Runs the monitor scan and returns its report.
    #[must_use]
    pub fn run_monitor(&self) -> MonitorReport {
        let state = self.state.read().unwrap();
        let now = self.clock.now();
        monitor::run(&state.rules, &state.log, self.lag_probe.as_ref(), now)
    }

    /// Takes a metrics snapshot, appends it to history, and performs
    /// housekeeping (history retention, optional operation pruning).
    pub fn snapshot_metrics(&self) -> ConsistencyMetrics {
        let mut state = self.state.write().unwrap();
        let now = state.next_stamp(self.clock.as_ref());

        let snapshot = metrics::snapshot(
            &self.config,
            &state.log,
            &state.violations,
            &state.resolutions,
            self.lag_probe.as_ref(),
            now,
        );
        debug!(
            score = snapshot.consistency_score,
            total_operations = snapshot.total_operations,
            violations_in_window = snapshot.violations_in_window,
            "metrics snapshot"
        );

        state.metrics_history.push(snapshot.clone());
        metrics::prune_history(&mut state.metrics_history, self.config.metrics_retention_ms, now);

        if let Some(retention) = self.config.operation_retention_ms {
            let pruned = state.log.prune_older_than(now.minus_ms(retention));
            if pruned > 0 {
                debug!(pruned, "pruned operations past retention horizon");
            }
        }

        snapshot
    }

    // ── Observability ────────────────────────────────────────────

    /// A full statistics dump: rules, violations, resolutions, metrics
    /// history, and the current overall score.
    #[must_use]
    pub fn statistics(&self) -> EngineStatistics {
        let state = self.state.read().unwrap();
        let now = self.clock.now();
        let window_start = now.minus_ms(self.config.metrics_window_ms);
        let violations_in_window = state
            .violations
            .values()
            .filter(|v| v.detected_at >= window_start)
            .count();

        EngineStatistics {
            rules: state.rules.all().cloned().collect(),
            violations: state.violations.values().cloned().collect(),
            resolutions: state.resolutions.values().cloned().collect(),
            metrics_history: state.metrics_history.clone(),
            overall_score: consistency_score(violations_in_window, state.log.len()),
        }
    }
}
