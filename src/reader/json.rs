//! JSON / NDJSON reader.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object (one row)
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Whole-document parse is attempted first; on failure the input is re-read
//! per line as NDJSON. Records are flattened (nested keys become dot paths),
//! and the column set is the union across rows, padding missing keys with
//! `Null`. An unparsable NDJSON line or a non-object item skips that row; a
//! file that parses as neither form aborts.

use std::fs;
use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::flatten::flatten_record;
use crate::types::{Table, Value};

use super::table_from_flat_rows;

/// Read a JSON or NDJSON file into a [`Table`].
pub fn read_json(path: impl AsRef<Path>, skip: &dyn Fn(&str)) -> ExtractResult<Table> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    read_json_str(&text, path, skip)
}

pub(crate) fn read_json_str(
    input: &str,
    path: &Path,
    skip: &dyn Fn(&str),
) -> ExtractResult<Table> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::Parse {
            path: path.to_path_buf(),
            message: "json input is empty".to_string(),
        });
    }

    // Whole-document parse first, NDJSON fallback.
    if let Ok(doc) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let items = match doc {
            serde_json::Value::Array(items) => items,
            obj @ serde_json::Value::Object(_) => vec![obj],
            _ => {
                return Err(ExtractError::Parse {
                    path: path.to_path_buf(),
                    message: "json must be an object, an array of objects, or NDJSON".to_string(),
                })
            }
        };
        return Ok(rows_from_values(items.into_iter().enumerate(), skip));
    }

    let mut values = Vec::new();
    let mut parsed_any = false;
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(v) => {
                parsed_any = true;
                values.push((i, v));
            }
            Err(e) => skip(&format!("line {}: invalid ndjson: {e}", i + 1)),
        }
    }
    if !parsed_any {
        return Err(ExtractError::Parse {
            path: path.to_path_buf(),
            message: "no parsable json document or ndjson line".to_string(),
        });
    }
    Ok(rows_from_values(values.into_iter(), skip))
}

fn rows_from_values(
    values: impl Iterator<Item = (usize, serde_json::Value)>,
    skip: &dyn Fn(&str),
) -> Table {
    let mut flat_rows: Vec<Vec<(String, Value)>> = Vec::new();
    for (idx0, v) in values {
        if !v.is_object() {
            skip(&format!("row {}: not a json object", idx0 + 1));
            continue;
        }
        flat_rows.push(flatten_record(&v));
    }
    table_from_flat_rows(flat_rows)
}
