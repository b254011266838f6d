//! Parquet writer.
//!
//! Column types are inferred from the projected table: a column whose cells
//! all render as finite numbers is written as DOUBLE, everything else as a
//! UTF8 byte array. Output goes to a tmp sibling first and is renamed into
//! place on success.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{ByteArray, ByteArrayType, DoubleType};
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{Table, Value};

use super::{tmp_path, write_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Utf8,
    Numeric,
}

/// Write `table` to a Parquet file at `path`.
pub fn write_parquet(table: &Table, path: &Path) -> ExtractResult<()> {
    let tmp = tmp_path(path);
    let result = write_parquet_inner(table, &tmp, path);
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_parquet_inner(table: &Table, tmp: &Path, path: &Path) -> ExtractResult<()> {
    let kinds: Vec<ColumnKind> = (0..table.columns.len())
        .map(|idx| infer_column_kind(table, idx))
        .collect();

    let fields: Vec<Arc<Type>> = table
        .columns
        .iter()
        .zip(&kinds)
        .map(|(name, kind)| build_field(name, *kind))
        .collect::<Result<_, _>>()
        .map_err(|e| parquet_error(path, e))?;

    let schema = Type::group_type_builder("schema")
        .with_fields(fields)
        .build()
        .map_err(|e| parquet_error(path, e))?;

    let file = File::create(tmp).map_err(|e| write_error(path, e))?;
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(file, Arc::new(schema), props)
        .map_err(|e| parquet_error(path, e))?;

    let mut row_group = writer.next_row_group().map_err(|e| parquet_error(path, e))?;
    let mut col_idx = 0;
    while let Some(mut col_writer) = row_group.next_column().map_err(|e| parquet_error(path, e))? {
        match kinds[col_idx] {
            ColumnKind::Utf8 => {
                let values: Vec<ByteArray> = table
                    .rows
                    .iter()
                    .map(|row| ByteArray::from(row[col_idx].render().as_str()))
                    .collect();
                col_writer
                    .typed::<ByteArrayType>()
                    .write_batch(&values, None, None)
                    .map_err(|e| parquet_error(path, e))?;
            }
            ColumnKind::Numeric => {
                let values: Vec<f64> = table
                    .rows
                    .iter()
                    .map(|row| row[col_idx].as_number().unwrap_or(0.0))
                    .collect();
                col_writer
                    .typed::<DoubleType>()
                    .write_batch(&values, None, None)
                    .map_err(|e| parquet_error(path, e))?;
            }
        }
        col_writer.close().map_err(|e| parquet_error(path, e))?;
        col_idx += 1;
    }
    row_group.close().map_err(|e| parquet_error(path, e))?;
    writer.close().map_err(|e| parquet_error(path, e))?;

    std::fs::rename(tmp, path).map_err(|e| write_error(path, e))
}

// Numeric only when every cell coerces; null or text anywhere falls back to
// strings, which is always representable.
fn infer_column_kind(table: &Table, idx: usize) -> ColumnKind {
    let all_numeric = !table.rows.is_empty()
        && table.rows.iter().all(|row| match &row[idx] {
            Value::Null | Value::Bool(_) => false,
            cell => cell.as_number().is_some(),
        });
    if all_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Utf8
    }
}

fn build_field(name: &str, kind: ColumnKind) -> Result<Arc<Type>, ParquetError> {
    let builder = match kind {
        ColumnKind::Utf8 => Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
            .with_converted_type(ConvertedType::UTF8),
        ColumnKind::Numeric => Type::primitive_type_builder(name, PhysicalType::DOUBLE),
    };
    builder.with_repetition(Repetition::REQUIRED).build().map(Arc::new)
}

fn parquet_error(path: &Path, e: ParquetError) -> ExtractError {
    write_error(path, std::io::Error::other(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parquet::read_parquet;

    #[test]
    fn round_trips_string_and_numeric_columns() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("r.parquet");
        let t = Table::new(
            vec!["name".to_string(), "score".to_string()],
            vec![
                vec![Value::Str("ada".to_string()), Value::Str("10".to_string())],
                vec![Value::Str("bob".to_string()), Value::Str("2.5".to_string())],
            ],
        );
        write_parquet(&t, &out).unwrap();

        let back = read_parquet(&out).unwrap();
        assert_eq!(back.columns, vec!["name".to_string(), "score".to_string()]);
        assert_eq!(back.rows[0][0], Value::Str("ada".to_string()));
        // Numeric column came back typed.
        assert_eq!(back.rows[0][1], Value::Num(10.0));
        assert_eq!(back.rows[1][1], Value::Num(2.5));
    }

    #[test]
    fn mixed_column_falls_back_to_strings() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("r.parquet");
        let t = Table::new(
            vec!["v".to_string()],
            vec![
                vec![Value::Str("1".to_string())],
                vec![Value::Str("x".to_string())],
            ],
        );
        write_parquet(&t, &out).unwrap();
        let back = read_parquet(&out).unwrap();
        assert_eq!(back.rows[0][0], Value::Str("1".to_string()));
        assert_eq!(back.rows[1][0], Value::Str("x".to_string()));
    }
}
