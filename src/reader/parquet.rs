//! Parquet reader.
//!
//! Reads the whole file through the Parquet record API. Declared column
//! names are preserved (leaf column paths, in schema order) and physical
//! values map onto the [`Value`] union; anything without a natural scalar
//! mapping is stringified.

use std::fs::File;
use std::path::Path;

use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{Table, Value};

/// Read a Parquet file into a [`Table`].
pub fn read_parquet(path: impl AsRef<Path>) -> ExtractResult<Table> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = SerializedFileReader::new(file).map_err(|e| ExtractError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let columns: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect();

    let iter = reader.get_row_iter(None).map_err(|e| ExtractError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row_res in iter {
        let row = row_res.map_err(|e| ExtractError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut cells = vec![Value::Null; columns.len()];
        for (name, field) in row.get_column_iter() {
            if let Some(idx) = columns.iter().position(|c| c == name) {
                cells[idx] = convert_field(field);
            }
        }
        rows.push(cells);
    }

    Ok(Table::new(columns, rows))
}

fn convert_field(f: &Field) -> Value {
    match f {
        Field::Null => Value::Null,
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(v) => Value::Num(f64::from(*v)),
        Field::Short(v) => Value::Num(f64::from(*v)),
        Field::Int(v) => Value::Num(f64::from(*v)),
        Field::Long(v) => Value::Num(*v as f64),
        Field::UByte(v) => Value::Num(f64::from(*v)),
        Field::UShort(v) => Value::Num(f64::from(*v)),
        Field::UInt(v) => Value::Num(f64::from(*v)),
        Field::ULong(v) => Value::Num(*v as f64),
        Field::Float(v) => Value::Num(f64::from(*v)),
        Field::Double(v) => Value::Num(*v),
        Field::Str(s) => Value::Str(s.clone()),
        other => Value::Str(other.to_string()),
    }
}
