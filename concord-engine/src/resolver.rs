//! The resolution driver — drains detected violations through the strategy
//! dispatch.
//!
//! Each violation is processed in isolation: a resolver failure marks that
//! violation `ignored` and moves on, so one bad payload can never stall the
//! queue. Violations whose rule is missing or disabled are left untouched
//! (there is no policy to resolve under), to be picked up if the rule comes
//! back.

use crate::config::EngineConfig;
use crate::oplog::OperationLog;
use crate::registry::RuleRegistry;
use concord_resolve::{
    confidence, first_write_wins, last_write_wins, shallow_merge, ResolveResult, Resolved,
    ResolverRegistry,
};
use concord_types::{
    ConflictResolution, ConsistencyViolation, DataOperation, HybridTimestamp, ResolutionStrategy,
    ViolationId, ViolationStatus,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Resolves pending violations, bounded by `max_resolutions_per_tick`.
/// Returns the resolutions recorded this pass.
pub(crate) fn resolve_pending(
    config: &EngineConfig,
    rules: &RuleRegistry,
    log: &OperationLog,
    resolvers: &ResolverRegistry,
    violations: &mut HashMap<ViolationId, ConsistencyViolation>,
    resolutions: &mut HashMap<ViolationId, ConflictResolution>,
    now: HybridTimestamp,
) -> Vec<ConflictResolution> {
    // Oldest first, so a backlog drains in detection order across ticks.
    let mut pending: Vec<ViolationId> = violations
        .values()
        .filter(|v| v.status == ViolationStatus::Detected)
        .map(|v| v.id)
        .collect();
    pending.sort_by_key(|id| id.as_uuid());
    pending.truncate(config.max_resolutions_per_tick);

    let mut recorded = Vec::new();

    for id in pending {
        let Some(violation) = violations.get_mut(&id) else {
            continue;
        };

        // No rule, or a disabled one, means no resolution policy: leave the
        // violation in `Detected` rather than guessing.
        let Some(rule) = rules.get(&violation.rule_id).filter(|r| r.enabled) else {
            debug!(violation = %id, "rule missing or disabled, leaving violation pending");
            continue;
        };

        if !violation.begin_resolving() {
            continue;
        }

        let ops: Vec<DataOperation> = log
            .entity_writes(&violation.entity_type, &violation.entity_id)
            .into_iter()
            .cloned()
            .collect();

        let (strategy, outcome) =
            dispatch(rule.requirements.resolution, resolvers, violation, &ops);

        match outcome {
            Ok(resolved) => {
                let data_age_ms = ops
                    .iter()
                    .map(|op| op.timestamp)
                    .max()
                    .map(|newest| now.ms_since(&newest))
                    .unwrap_or(0);
                let score = confidence::score(violation.kind, resolved.confidence, data_age_ms);

                let resolution = ConflictResolution::new(
                    violation.id,
                    strategy,
                    resolved.value,
                    config.resolver_identity.clone(),
                    now,
                    score,
                    resolved.metadata,
                );

                violation.mark_resolved(now);
                // At most one resolution per violation, ever.
                resolutions
                    .entry(violation.id)
                    .or_insert_with(|| resolution.clone());
                debug!(
                    violation = %violation.id,
                    strategy = ?strategy,
                    confidence = score,
                    "violation resolved"
                );
                recorded.push(resolution);
            }
            Err(err) => {
                warn!(violation = %violation.id, error = %err, "resolution failed, ignoring violation");
                violation.mark_ignored(err.to_string());
            }
        }
    }

    recorded
}

/// Dispatches to the strategy the rule configured. `custom` consults the
/// resolver registry and falls back to last-write-wins for entity types
/// with no registered resolver, so the resolve tick always makes progress.
fn dispatch(
    strategy: ResolutionStrategy,
    resolvers: &ResolverRegistry,
    violation: &ConsistencyViolation,
    ops: &[DataOperation],
) -> (ResolutionStrategy, ResolveResult<Resolved>) {
    match strategy {
        ResolutionStrategy::LastWriteWins => (strategy, last_write_wins(ops)),
        ResolutionStrategy::FirstWriteWins => (strategy, first_write_wins(ops)),
        ResolutionStrategy::Merge => (strategy, shallow_merge(ops)),
        ResolutionStrategy::Custom => match resolvers.get(&violation.entity_type) {
            Some(resolver) => (strategy, resolver.resolve(violation, ops)),
            None => {
                debug!(
                    entity_type = %violation.entity_type,
                    "no custom resolver registered, falling back to last-write-wins"
                );
                (ResolutionStrategy::LastWriteWins, last_write_wins(ops))
            }
        },
    }
}
