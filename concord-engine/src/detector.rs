//! Violation detection — runs synchronously on the registration path.
//!
//! Detection is deliberately cheap: every check is a bounded per-entity
//! lookup. Anything that needs a full-log scan (replication lag, orphaned
//! dependencies) belongs to the periodic monitor, not here.

use crate::config::EngineConfig;
use crate::oplog::OperationLog;
use crate::registry::RuleRegistry;
use concord_types::{
    ConsistencyRule, ConsistencyViolation, DataOperation, OperationKind, RuleScope, Severity,
    ViolationKind,
};
use tracing::debug;

/// Evaluates a freshly registered operation against every matching enabled
/// rule and returns the violations found, in `Detected` state.
pub fn detect(
    config: &EngineConfig,
    registry: &RuleRegistry,
    log: &OperationLog,
    op: &DataOperation,
) -> Vec<ConsistencyViolation> {
    let mut violations = Vec::new();

    for rule in registry.rules_for(&op.entity_type) {
        if !scope_matches(rule, op) {
            continue;
        }

        match op.kind {
            OperationKind::Read => {
                if let Some(violation) = check_read(config, rule, log, op) {
                    violations.push(violation);
                }
            }
            OperationKind::Update | OperationKind::Delete => {
                if let Some(violation) = check_write(config, rule, log, op) {
                    violations.push(violation);
                }
            }
            OperationKind::Create => {}
        }
    }

    if !violations.is_empty() {
        debug!(
            operation = %op.id,
            entity_type = %op.entity_type,
            entity_id = %op.entity_id,
            count = violations.len(),
            "detected violations"
        );
    }

    violations
}

/// Whether a rule's scope applies to an operation. `global` always matches;
/// `user` matches any attributed operation (every operation carries an
/// actor); `session` requires a session id; `entity` matches by entity type,
/// which `rules_for` already guaranteed.
fn scope_matches(rule: &ConsistencyRule, op: &DataOperation) -> bool {
    match rule.scope {
        RuleScope::Global | RuleScope::User | RuleScope::Entity => true,
        RuleScope::Session => op.session.is_some(),
    }
}

/// Read check: how stale was the data this read observed?
///
/// A rule opts in with a staleness threshold; `Some(0)` means any
/// observable delay trips it. Without a threshold the check is skipped even
/// when `read_consistency` is set.
fn check_read(
    config: &EngineConfig,
    rule: &ConsistencyRule,
    log: &OperationLog,
    op: &DataOperation,
) -> Option<ConsistencyViolation> {
    if !rule.requirements.read_consistency {
        return None;
    }
    let threshold = rule.requirements.staleness_threshold_ms?;
    let latest = log.latest_write(&op.entity_type, &op.entity_id)?;

    let staleness = op.timestamp.ms_since(&latest.timestamp);
    if staleness <= threshold {
        return None;
    }

    let severity = if staleness > config.staleness_high_ms {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(ConsistencyViolation::new(
        rule.id,
        op.entity_type.clone(),
        op.entity_id.clone(),
        ViolationKind::Staleness,
        severity,
        format!(
            "read observed data {staleness}ms stale (threshold {threshold}ms)"
        ),
        op.timestamp,
        serde_json::json!({
            "operation_id": op.id,
            "latest_write": latest.id,
            "staleness_ms": staleness,
            "threshold_ms": threshold,
        }),
    ))
}

/// Write check: did another update land inside the collision window?
fn check_write(
    config: &EngineConfig,
    rule: &ConsistencyRule,
    log: &OperationLog,
    op: &DataOperation,
) -> Option<ConsistencyViolation> {
    if !rule.requirements.write_consistency {
        return None;
    }

    let window_start = op.timestamp.minus_ms(config.collision_window_ms);
    let colliding = log.writes_in_window(&op.entity_type, &op.entity_id, window_start, op.id);
    if colliding.is_empty() {
        return None;
    }

    let colliding_ids: Vec<_> = colliding.iter().map(|c| c.id).collect();
    Some(ConsistencyViolation::new(
        rule.id,
        op.entity_type.clone(),
        op.entity_id.clone(),
        ViolationKind::WriteConflict,
        Severity::High,
        format!(
            "{} concurrent update(s) within the {}ms collision window",
            colliding_ids.len(),
            config.collision_window_ms
        ),
        op.timestamp,
        serde_json::json!({
            "operation_id": op.id,
            "colliding_operations": colliding_ids,
            "window_ms": config.collision_window_ms,
        }),
    ))
}
