//! Nested-record flattening.
//!
//! YAML and JSON sources may contain nested mappings and sequences. Before a
//! [`crate::types::Table`] is built, each record is flattened into
//! `(path, scalar)` pairs where the path joins nested keys with `.` and
//! sequence positions with their integer index: `{"user": {"tags": ["a"]}}`
//! becomes `user.tags.0 = "a"`.
//!
//! Empty mappings and sequences emit no path at all (no placeholder null).
//! Paths are deterministic: flattening the same record twice yields the same
//! names in the same order, and flattening an already-flat record is a no-op.

use serde_json::Value as JsonValue;

use crate::types::Value;

/// Flatten one record into ordered `(path, value)` pairs.
///
/// A scalar at the top level (no mapping to descend into) is emitted under
/// the path `value`, so degenerate documents still produce one column.
pub fn flatten_record(record: &JsonValue) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(record, String::new(), &mut out);
    out
}

fn flatten_into(node: &JsonValue, path: String, out: &mut Vec<(String, Value)>) {
    match node {
        JsonValue::Object(map) => {
            for (key, child) in map {
                flatten_into(child, join(&path, key), out);
            }
        }
        JsonValue::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                flatten_into(child, join(&path, &idx.to_string()), out);
            }
        }
        scalar => {
            let name = if path.is_empty() {
                "value".to_string()
            } else {
                path
            };
            out.push((name, scalar_value(scalar)));
        }
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn scalar_value(v: &JsonValue) -> Value {
    match v {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => Value::Num(n.as_f64().unwrap_or(f64::MAX)),
        JsonValue::String(s) => Value::Str(s.clone()),
        // Containers are handled by the caller.
        JsonValue::Array(_) | JsonValue::Object(_) => unreachable!("container passed as scalar"),
    }
}
