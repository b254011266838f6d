//! Row projection: arrange the unique-value set for the writer.

use crate::config::RowFormat;
use crate::extract::ExtractionResult;
use crate::types::{Table, Value};

/// Column name used for the filter description in `single` layout.
pub const FILTERS_COLUMN: &str = "filters";

/// Project an [`ExtractionResult`] into the final row set.
///
/// - [`RowFormat::Single`]: one row; the target column holds every unique
///   value joined by `separator` in sorted order. When a filter description
///   is supplied (non-empty), a second `filters` column carries it.
/// - [`RowFormat::Multi`]: one row per value, target column only; the filter
///   description is not repeated per row.
pub fn project(
    result: &ExtractionResult,
    row_format: RowFormat,
    column_name: &str,
    separator: &str,
    filter_description: &str,
) -> Table {
    match row_format {
        RowFormat::Single => {
            let joined = Value::Str(result.values.join(separator));
            if filter_description.is_empty() {
                Table::new(vec![column_name.to_string()], vec![vec![joined]])
            } else {
                Table::new(
                    vec![column_name.to_string(), FILTERS_COLUMN.to_string()],
                    vec![vec![joined, Value::Str(filter_description.to_string())]],
                )
            }
        }
        RowFormat::Multi => Table::new(
            vec![column_name.to_string()],
            result
                .values
                .iter()
                .map(|v| vec![Value::Str(v.clone())])
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(values: &[&str]) -> ExtractionResult {
        ExtractionResult {
            values: values.iter().map(|v| v.to_string()).collect(),
            numeric_sort: false,
        }
    }

    #[test]
    fn single_layout_joins_values() {
        let t = project(&result(&["a", "b"]), RowFormat::Single, "tags", ";", "");
        assert_eq!(t.columns, vec!["tags".to_string()]);
        assert_eq!(t.rows, vec![vec![Value::Str("a;b".to_string())]]);
    }

    #[test]
    fn single_layout_tags_active_filters() {
        let t = project(
            &result(&["a"]),
            RowFormat::Single,
            "tags",
            ";",
            "status=active",
        );
        assert_eq!(
            t.columns,
            vec!["tags".to_string(), FILTERS_COLUMN.to_string()]
        );
        assert_eq!(t.rows[0][1], Value::Str("status=active".to_string()));
    }

    #[test]
    fn multi_layout_emits_one_row_per_value() {
        let t = project(&result(&["1", "3"]), RowFormat::Multi, "id", ";", "ignored");
        assert_eq!(t.columns, vec!["id".to_string()]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.rows[1][0], Value::Str("3".to_string()));
    }
}
