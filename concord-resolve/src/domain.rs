//! Domain resolvers for the entity types the engine ships rules for.
//!
//! Payloads are inspected structurally via `serde_json::Value`; a resolver
//! never fails on a missing field, it degrades to the generic strategy
//! instead. Shapes handled here:
//!
//! - `preference`: `{ "value": ..., "source": "explicit" | "inferred", ... }`
//! - `session_memory`: `{ "messages": [...], "context": {...}, "metadata": {...} }`
//! - `pattern`: `{ "patterns": [...], "confidence": 0.0..1.0 }`

use crate::builtin::{chronological, last_write_wins};
use crate::error::{ResolveError, ResolveResult};
use crate::strategy::{EntityResolver, Resolved};
use concord_types::{ConsistencyViolation, DataOperation};
use serde_json::{Map, Value};

/// Explicit user input beats inferred values; ties resolve by recency.
pub struct PreferenceResolver;

impl EntityResolver for PreferenceResolver {
    fn resolve(
        &self,
        _violation: &ConsistencyViolation,
        ops: &[DataOperation],
    ) -> ResolveResult<Resolved> {
        if ops.is_empty() {
            return Err(ResolveError::NoOperations);
        }

        let explicit: Vec<DataOperation> = ops
            .iter()
            .filter(|op| {
                op.payload
                    .get("source")
                    .and_then(Value::as_str)
                    .is_some_and(|s| s == "explicit")
            })
            .cloned()
            .collect();

        if explicit.is_empty() {
            // Nothing marked explicit — plain recency decides.
            return last_write_wins(ops);
        }

        let mut resolved = last_write_wins(&explicit)?;
        resolved.confidence = Some(0.95);
        if let Value::Object(map) = &mut resolved.metadata {
            map.insert(
                "explicit_candidates".into(),
                Value::from(explicit.len()),
            );
        }
        Ok(resolved)
    }
}

/// Concatenates message lists chronologically and shallow-merges the
/// `context` and `metadata` maps.
pub struct SessionMemoryResolver;

impl EntityResolver for SessionMemoryResolver {
    fn resolve(
        &self,
        _violation: &ConsistencyViolation,
        ops: &[DataOperation],
    ) -> ResolveResult<Resolved> {
        let ordered = chronological(ops);
        if ordered.is_empty() {
            return Err(ResolveError::NoOperations);
        }

        let mut messages: Vec<Value> = Vec::new();
        let mut context: Map<String, Value> = Map::new();
        let mut metadata: Map<String, Value> = Map::new();

        for op in &ordered {
            if let Some(Value::Array(batch)) = op.payload.get("messages") {
                messages.extend(batch.iter().cloned());
            }
            if let Some(Value::Object(fields)) = op.payload.get("context") {
                for (key, value) in fields {
                    context.insert(key.clone(), value.clone());
                }
            }
            if let Some(Value::Object(fields)) = op.payload.get("metadata") {
                for (key, value) in fields {
                    metadata.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(Resolved {
            value: serde_json::json!({
                "messages": messages,
                "context": context,
                "metadata": metadata,
            }),
            confidence: None,
            metadata: serde_json::json!({
                "merged_operations": ordered.iter().map(|op| op.id).collect::<Vec<_>>(),
            }),
        })
    }
}

/// Concatenates pattern lists and recomputes the mean confidence across all
/// contributing operations that carry one.
pub struct PatternResolver;

impl EntityResolver for PatternResolver {
    fn resolve(
        &self,
        _violation: &ConsistencyViolation,
        ops: &[DataOperation],
    ) -> ResolveResult<Resolved> {
        let ordered = chronological(ops);
        if ordered.is_empty() {
            return Err(ResolveError::NoOperations);
        }

        let mut patterns: Vec<Value> = Vec::new();
        let mut confidences: Vec<f64> = Vec::new();

        for op in &ordered {
            if let Some(Value::Array(batch)) = op.payload.get("patterns") {
                patterns.extend(batch.iter().cloned());
            }
            if let Some(c) = op.payload.get("confidence").and_then(Value::as_f64) {
                confidences.push(c.clamp(0.0, 1.0));
            }
        }

        let mean_confidence = if confidences.is_empty() {
            None
        } else {
            Some(confidences.iter().sum::<f64>() / confidences.len() as f64)
        };

        let mut value = serde_json::json!({ "patterns": patterns });
        if let Some(c) = mean_confidence {
            value["confidence"] = Value::from(c);
        }

        Ok(Resolved {
            value,
            confidence: mean_confidence,
            metadata: serde_json::json!({
                "merged_operations": ordered.iter().map(|op| op.id).collect::<Vec<_>>(),
            }),
        })
    }
}
