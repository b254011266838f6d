//! Delimited-text reader (CSV/TSV).
//!
//! The first record is the header. Ragged rows are padded with `Null` rather
//! than rejected; cells that fail to decode skip just their row. Cells are
//! kept as strings (empty cell means `Null`); typing happens later, at
//! comparison and sort time, so values like `007` survive loading intact.

use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{Table, Value};

/// Read a delimited text file into a [`Table`].
pub fn read_delimited(
    path: impl AsRef<Path>,
    delimiter: u8,
    skip: &dyn Fn(&str),
) -> ExtractResult<Table> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            let message = e.to_string();
            match e.into_kind() {
                csv::ErrorKind::Io(io) => ExtractError::Io(io),
                _ => ExtractError::Parse {
                    path: path.to_path_buf(),
                    message,
                },
            }
        })?;

    let headers = rdr.headers().map_err(|e| ExtractError::Parse {
        path: path.to_path_buf(),
        message: format!("unreadable header: {e}"),
    })?;
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    if columns.is_empty() {
        return Err(ExtractError::Parse {
            path: path.to_path_buf(),
            message: "empty header row".to_string(),
        });
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, result) in rdr.records().enumerate() {
        // 1-based for users; +1 again because the header is line 1.
        let user_row = idx0 + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                skip(&format!("row {user_row}: {e}"));
                continue;
            }
        };

        let mut row: Vec<Value> = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            row.push(cell_value(record.get(i)));
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn cell_value(raw: Option<&str>) -> Value {
    match raw {
        None => Value::Null,
        Some(s) if s.is_empty() => Value::Null,
        Some(s) => Value::Str(s.to_string()),
    }
}
