//! YAML reader.
//!
//! Accepts a single document or a `---`-separated multi-document stream. A
//! top-level sequence yields one row per item; a top-level mapping yields one
//! row; an empty document is ignored. Rows go through the flattener, so
//! nested mappings become dot paths and the column set is the union across
//! rows.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ExtractError, ExtractResult};
use crate::flatten::flatten_record;
use crate::types::{Table, Value};

use super::table_from_flat_rows;

/// Read a YAML file into a [`Table`].
pub fn read_yaml(path: impl AsRef<Path>, skip: &dyn Fn(&str)) -> ExtractResult<Table> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    read_yaml_str(&text, path, skip)
}

pub(crate) fn read_yaml_str(
    input: &str,
    path: &Path,
    skip: &dyn Fn(&str),
) -> ExtractResult<Table> {
    let mut flat_rows: Vec<Vec<(String, Value)>> = Vec::new();

    for (doc_idx, doc) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let value = serde_yaml::Value::deserialize(doc).map_err(|e| ExtractError::Parse {
            path: path.to_path_buf(),
            message: format!("document {}: {e}", doc_idx + 1),
        })?;

        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Sequence(items) => {
                for (item_idx, item) in items.into_iter().enumerate() {
                    match to_json(&item) {
                        Some(v) if v.is_object() => flat_rows.push(flatten_record(&v)),
                        _ => skip(&format!(
                            "document {} item {}: not a mapping",
                            doc_idx + 1,
                            item_idx + 1
                        )),
                    }
                }
            }
            mapping @ serde_yaml::Value::Mapping(_) => match to_json(&mapping) {
                Some(v) => flat_rows.push(flatten_record(&v)),
                None => skip(&format!("document {}: unrepresentable keys", doc_idx + 1)),
            },
            _ => skip(&format!("document {}: scalar document", doc_idx + 1)),
        }
    }

    Ok(table_from_flat_rows(flat_rows))
}

// YAML allows non-string mapping keys; serde_json stringifies numeric keys
// and rejects the rest, which we treat as a row-level skip.
fn to_json(v: &serde_yaml::Value) -> Option<serde_json::Value> {
    serde_json::to_value(v).ok()
}
