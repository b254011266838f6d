//! Format writers: one projected [`Table`] in, one output file out.
//!
//! Text formats (CSV/JSON/YAML) are rendered fully in memory, written to a
//! `<path>.tmp` sibling, and renamed into place, so a failed write never
//! leaves a readable partial file. Parquet goes through the same tmp+rename
//! dance in [`parquet`]. Under dry-run the rendered content is printed and
//! the filesystem is never touched.

pub mod parquet;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::error::{ExtractError, ExtractResult};
use crate::types::{Table, Value};

/// Options controlling output serialization.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub format: OutputFormat,
    /// Delimiter for CSV output.
    pub delimiter: u8,
    /// Print the would-be content instead of writing it.
    pub dry_run: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            delimiter: b',',
            dry_run: false,
        }
    }
}

/// Serialize `table` to `path` in the requested format.
pub fn write_table(table: &Table, path: impl AsRef<Path>, options: &WriteOptions) -> ExtractResult<()> {
    let path = path.as_ref();

    if options.dry_run {
        println!("Dry run - output not written");
        print!("{}", render_preview(table, options)?);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
        }
    }

    match options.format {
        OutputFormat::Csv => write_atomic(path, render_csv(table, options.delimiter)?.as_bytes()),
        OutputFormat::Json => write_atomic(path, render_json(table)?.as_bytes()),
        OutputFormat::Yaml => write_atomic(path, render_yaml(table)?.as_bytes()),
        OutputFormat::Parquet => parquet::write_parquet(table, path),
    }
}

/// The content dry-run prints: exact rendered output for text formats, a
/// CSV-shaped preview for parquet.
pub fn render_preview(table: &Table, options: &WriteOptions) -> ExtractResult<String> {
    match options.format {
        OutputFormat::Csv => render_csv(table, options.delimiter),
        OutputFormat::Json => render_json(table),
        OutputFormat::Yaml => render_yaml(table),
        OutputFormat::Parquet => render_csv(table, options.delimiter),
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> ExtractResult<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, content).map_err(|e| write_error(path, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        write_error(path, e)
    })
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

pub(crate) fn write_error(path: &Path, source: std::io::Error) -> ExtractError {
    ExtractError::OutputWrite {
        path: path.to_path_buf(),
        source,
    }
}

fn render_csv(table: &Table, delimiter: u8) -> ExtractResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    wtr.write_record(&table.columns)
        .map_err(csv_render_error)?;
    for row in &table.rows {
        let record: Vec<String> = row.iter().map(Value::render).collect();
        wtr.write_record(&record).map_err(csv_render_error)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| render_error("csv", e))?;
    String::from_utf8(bytes).map_err(|e| render_error("csv", e))
}

// In-memory rendering is effectively infallible; surface anything that does
// go wrong as an I/O error.
fn render_error(format: &str, e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Io(std::io::Error::other(format!("{format} render: {e}")))
}

fn csv_render_error(e: csv::Error) -> ExtractError {
    render_error("csv", e)
}

fn render_json(table: &Table) -> ExtractResult<String> {
    let rows: Vec<serde_json::Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for (name, cell) in table.columns.iter().zip(row) {
                obj.insert(name.clone(), json_value(cell));
            }
            serde_json::Value::Object(obj)
        })
        .collect();

    let mut text =
        serde_json::to_string_pretty(&rows).map_err(|e| render_error("json", e))?;
    text.push('\n');
    Ok(text)
}

fn json_value(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Num(n) => {
            // Integral numbers serialize without a fractional part.
            if n.fract() == 0.0 && n.abs() < 1e15 {
                serde_json::Value::from(*n as i64)
            } else {
                serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
    }
}

fn render_yaml(table: &Table) -> ExtractResult<String> {
    let rows: Vec<serde_json::Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for (name, cell) in table.columns.iter().zip(row) {
                obj.insert(name.clone(), json_value(cell));
            }
            serde_json::Value::Object(obj)
        })
        .collect();

    serde_yaml::to_string(&rows).map_err(|e| render_error("yaml", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn sample_table() -> Table {
        Table::new(
            vec!["id".to_string()],
            vec![
                vec![Value::Str("1".to_string())],
                vec![Value::Str("3".to_string())],
            ],
        )
    }

    #[test]
    fn csv_has_header_and_configured_delimiter() {
        let csv = render_csv(&sample_table(), b';').unwrap();
        assert_eq!(csv, "id\n1\n3\n");

        let two_col = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::Str("1".to_string()), Value::Str("2".to_string())]],
        );
        assert_eq!(render_csv(&two_col, b';').unwrap(), "a;b\n1;2\n");
    }

    #[test]
    fn json_is_a_list_of_per_row_objects() {
        let text = render_json(&sample_table()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, serde_json::json!([{"id": "1"}, {"id": "3"}]));
    }

    #[test]
    fn yaml_is_a_sequence_of_mappings() {
        let text = render_yaml(&sample_table()).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert!(parsed.as_sequence().is_some());
        assert_eq!(parsed[0]["id"], serde_yaml::Value::String("1".to_string()));
    }

    #[test]
    fn integral_numbers_do_not_gain_a_fraction() {
        let t = Table::new(vec!["n".to_string()], vec![vec![Value::Num(7.0)]]);
        let text = render_json(&t).unwrap();
        assert!(text.contains("7"));
        assert!(!text.contains("7.0"));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("result.csv");
        let opts = WriteOptions {
            dry_run: true,
            ..Default::default()
        };
        write_table(&sample_table(), &out, &opts).unwrap();
        assert!(!out.exists());
        assert!(!tmp_path(&out).exists());
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/dir/result.csv");
        write_table(&sample_table(), &out, &WriteOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "id\n1\n3\n");
        assert!(!tmp_path(&out).exists());
    }

    #[test]
    fn unwritable_target_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the target path makes the rename fail.
        let out = dir.path().join("taken");
        std::fs::create_dir(&out).unwrap();
        let err = write_table(&sample_table(), &out, &WriteOptions::default()).unwrap_err();
        assert!(matches!(err, ExtractError::OutputWrite { .. }));
        assert_eq!(err.exit_code(), 4);
        assert!(!tmp_path(&out).exists());
    }

    #[test]
    fn yaml_format_writes_parseable_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("r.yaml");
        let opts = WriteOptions {
            format: OutputFormat::Yaml,
            ..Default::default()
        };
        write_table(&sample_table(), &out, &opts).unwrap();
        let parsed: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed.as_sequence().unwrap().len(), 2);
    }
}
