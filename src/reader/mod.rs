//! Format readers: one input file in, one [`Table`] out.
//!
//! Most callers should use [`read_table_from_path`], which:
//!
//! - auto-detects the format by file extension (or you can force one via
//!   [`ReadOptions::format`])
//! - normalizes the file into an in-memory [`Table`]
//! - reports skipped rows to an optional [`PipelineObserver`]
//!
//! Format-specific readers are also available under [`delimited`], [`json`],
//! [`yaml`], and [`parquet`].
//!
//! Failure policy: a row-level decode problem (bad UTF-8 line, unparsable
//! NDJSON line, non-object item) is reported and the row skipped; a
//! structurally invalid file aborts with [`ExtractError::Parse`].

pub mod delimited;
pub mod json;
pub mod parquet;
pub mod yaml;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ExtractError, ExtractResult};
use crate::observe::{PipelineObserver, Stage};
use crate::types::Table;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Delimited text (CSV/TSV).
    Delimited,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// One or more YAML documents.
    Yaml,
    /// Apache Parquet.
    Parquet,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Delimited),
            "json" | "ndjson" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Options controlling how an input file is read.
#[derive(Clone, Default)]
pub struct ReadOptions {
    /// If `None`, auto-detect format from the file extension.
    pub format: Option<InputFormat>,
    /// Delimiter for delimited-text input; `None` means `,`.
    pub delimiter: Option<u8>,
    /// Optional observer for skipped-row reporting.
    pub observer: Option<Arc<dyn PipelineObserver>>,
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("format", &self.format)
            .field("delimiter", &self.delimiter)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Unified read entry point.
///
/// The path must exist and be a regular file; the format is taken from
/// `options.format` or inferred from the extension.
pub fn read_table_from_path(path: impl AsRef<Path>, options: &ReadOptions) -> ExtractResult<Table> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let skip = |detail: &str| {
        if let Some(obs) = options.observer.as_ref() {
            obs.on_row_skipped(Stage::Read, detail);
        }
    };

    match format {
        InputFormat::Delimited => {
            delimited::read_delimited(path, options.delimiter.unwrap_or(b','), &skip)
        }
        InputFormat::Json => json::read_json(path, &skip),
        InputFormat::Yaml => yaml::read_yaml(path, &skip),
        InputFormat::Parquet => parquet::read_parquet(path),
    }
}

fn infer_format_from_path(path: &Path) -> ExtractResult<InputFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ExtractError::UnsupportedFormat {
            detail: format!("path has no extension ({})", path.display()),
        })?;

    InputFormat::from_extension(ext).ok_or_else(|| ExtractError::UnsupportedFormat {
        detail: format!("unrecognized extension '{ext}' ({})", path.display()),
    })
}

/// Build a rectangular [`Table`] from per-row flat mappings.
///
/// The column set is the union of all row keys in first-seen order; keys
/// absent from a given row yield `Null` in that row. Shared by the JSON and
/// YAML readers after flattening.
pub(crate) fn table_from_flat_rows(
    flat_rows: Vec<Vec<(String, crate::types::Value)>>,
) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for row in &flat_rows {
        for (name, _) in row {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
    }

    let rows = flat_rows
        .into_iter()
        .map(|flat| {
            let mut cells = vec![crate::types::Value::Null; columns.len()];
            for (name, value) in flat {
                // Column is always present; it was collected above.
                if let Some(idx) = columns.iter().position(|c| c == &name) {
                    cells[idx] = value;
                }
            }
            cells
        })
        .collect();

    Table::new(columns, rows)
}
