//! Built-in resolution strategies: last-write-wins, first-write-wins, and
//! field-level shallow merge.
//!
//! All three operate on the conflicting operations ordered oldest-first by
//! (timestamp, version). Version breaks timestamp ties deterministically, so
//! resolving the same set of operations twice yields identical output.

use crate::error::{ResolveError, ResolveResult};
use crate::strategy::Resolved;
use concord_types::DataOperation;
use serde_json::{Map, Value};

/// Orders operations oldest-first by (timestamp, version).
#[must_use]
pub fn chronological(ops: &[DataOperation]) -> Vec<&DataOperation> {
    let mut ordered: Vec<&DataOperation> = ops.iter().collect();
    ordered.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.version.cmp(&b.version))
    });
    ordered
}

/// The newest operation's payload wins.
pub fn last_write_wins(ops: &[DataOperation]) -> ResolveResult<Resolved> {
    let ordered = chronological(ops);
    let winner = ordered.last().ok_or(ResolveError::NoOperations)?;
    Ok(Resolved {
        value: winner.payload.clone(),
        confidence: None,
        metadata: serde_json::json!({ "winning_operation": winner.id }),
    })
}

/// The oldest operation's payload wins.
pub fn first_write_wins(ops: &[DataOperation]) -> ResolveResult<Resolved> {
    let ordered = chronological(ops);
    let winner = ordered.first().ok_or(ResolveError::NoOperations)?;
    Ok(Resolved {
        value: winner.payload.clone(),
        confidence: None,
        metadata: serde_json::json!({ "winning_operation": winner.id }),
    })
}

/// Field-level shallow union in chronological order: later fields overwrite
/// earlier ones. A non-object payload replaces everything accumulated so
/// far, matching whole-document last-write-wins for unstructured data.
pub fn shallow_merge(ops: &[DataOperation]) -> ResolveResult<Resolved> {
    let ordered = chronological(ops);
    if ordered.is_empty() {
        return Err(ResolveError::NoOperations);
    }

    let mut merged: Map<String, Value> = Map::new();
    let mut non_object: Option<Value> = None;

    for op in &ordered {
        match &op.payload {
            Value::Object(fields) => {
                non_object = None;
                for (key, value) in fields {
                    merged.insert(key.clone(), value.clone());
                }
            }
            other => {
                merged.clear();
                non_object = Some(other.clone());
            }
        }
    }

    let value = match non_object {
        Some(v) => v,
        None => Value::Object(merged),
    };

    Ok(Resolved {
        value,
        confidence: None,
        metadata: serde_json::json!({
            "merged_operations": ordered.iter().map(|op| op.id).collect::<Vec<_>>(),
        }),
    })
}
