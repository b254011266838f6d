//! Core data model: cell values and the in-memory [`Table`].
//!
//! Every input format is normalized into a [`Table`] before filtering and
//! extraction. A table is rectangular by construction: each row holds exactly
//! one [`Value`] per column.

use std::fmt;

use crate::error::{ExtractError, ExtractResult};

/// A single cell value.
///
/// This is a closed tagged union; comparisons in the filter engine dispatch
/// on the tag explicitly rather than relying on implicit coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// UTF-8 string.
    Str(String),
    /// Number. Integral values round-trip through [`Value::render`] without a
    /// fractional part.
    Num(f64),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// True if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Stringified form used for equality filters, regex matching, and
    /// output serialization. `Null` renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Str(s) => s.clone(),
            Value::Num(n) => format_number(*n),
            Value::Bool(b) => b.to_string(),
        }
    }

    /// Numeric coercion used by comparison filters.
    ///
    /// Strings are parsed after trimming; `Null` and `Bool` do not coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Str(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Null | Value::Bool(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render a number the way users wrote it: `1.0` stays `1`, `1.5` stays `1.5`.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored row-major in the same order as `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Row-major value storage; every row has `columns.len()` cells.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from column names and rows.
    ///
    /// # Panics
    ///
    /// Panics if any row's length differs from the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        for row in &rows {
            assert!(
                row.len() == columns.len(),
                "row length {} does not match column count {}",
                row.len(),
                columns.len()
            );
        }
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Column index or a [`ExtractError::FieldNotFound`] naming the
    /// available columns.
    pub fn require_column(&self, name: &str) -> ExtractResult<usize> {
        self.column_index(name)
            .ok_or_else(|| ExtractError::FieldNotFound {
                field: name.to_string(),
                available: self.columns.join(", "),
            })
    }

    /// Available fields, for the interactive boundary.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Distinct stringified non-null values of a column, sorted, pre-filter.
    ///
    /// This is the second introspection query the interactive boundary uses
    /// (between prompts, to offer completion candidates).
    pub fn distinct_raw_values(&self, field: &str) -> ExtractResult<Vec<String>> {
        let idx = self.require_column(field)?;
        let mut out: Vec<String> = self
            .rows
            .iter()
            .filter_map(|row| match &row[idx] {
                Value::Null => None,
                v => Some(v.render()),
            })
            .collect();
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original column set.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(
            vec!["id".to_string(), "status".to_string()],
            vec![
                vec![Value::Num(1.0), Value::Str("active".to_string())],
                vec![Value::Num(2.0), Value::Str("inactive".to_string())],
                vec![Value::Num(3.0), Value::Null],
            ],
        )
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Value::Num(1.0).render(), "1");
        assert_eq!(Value::Num(1.5).render(), "1.5");
        assert_eq!(Value::Num(-3.0).render(), "-3");
    }

    #[test]
    fn null_and_bool_do_not_coerce_to_number() {
        assert_eq!(Value::Null.as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
        assert_eq!(Value::Str(" 42 ".to_string()).as_number(), Some(42.0));
        assert_eq!(Value::Str("thirty".to_string()).as_number(), None);
    }

    #[test]
    fn distinct_raw_values_skips_nulls_and_sorts() {
        let t = sample_table();
        assert_eq!(
            t.distinct_raw_values("status").unwrap(),
            vec!["active".to_string(), "inactive".to_string()]
        );
    }

    #[test]
    fn require_column_reports_available_columns() {
        let t = sample_table();
        let err = t.require_column("missing").unwrap_err();
        assert!(err.to_string().contains("id, status"));
    }

    #[test]
    fn filter_rows_preserves_columns() {
        let t = sample_table();
        let out = t.filter_rows(|row| !row[1].is_null());
        assert_eq!(out.columns, t.columns);
        assert_eq!(out.row_count(), 2);
    }
}
