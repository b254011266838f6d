//! Conjunctive filter evaluation over a [`Table`].

use crate::error::{ExtractError, ExtractResult};
use crate::types::{Table, Value};

use super::{FilterClause, FilterOp};

/// Return the subset of rows satisfying the AND of all clauses.
///
/// Every clause field is validated against the column set up front: a typo'd
/// field aborts the whole stage with [`ExtractError::FieldNotFound`] rather
/// than silently matching nothing. Clauses short-circuit left-to-right.
///
/// Per-clause semantics:
/// - `=`/`!=`: case-sensitive string equality of the stringified cell against
///   any member of the value-set; a null cell excludes the row under both.
/// - `>`, `<`, `>=`, `<=`: cell and literal coerced to numeric; a non-null
///   cell (or literal) that fails coercion aborts with
///   [`ExtractError::NumericConversion`]; a null cell just fails the clause.
/// - `~`: regex search against the stringified cell; null fails.
pub fn apply_filters(table: &Table, clauses: &[FilterClause]) -> ExtractResult<Table> {
    // Validate fields and comparison literals up front, so a bad clause is
    // rejected even when the table has no rows.
    let mut indexed: Vec<(usize, &FilterClause)> = Vec::with_capacity(clauses.len());
    for clause in clauses {
        let idx = table.require_column(&clause.field)?;
        if clause.op.is_comparison() {
            let literal = &clause.values[0];
            literal
                .trim()
                .parse::<f64>()
                .map_err(|_| conversion_error(clause, literal))?;
        }
        indexed.push((idx, clause));
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row in &table.rows {
        let mut keep = true;
        for (idx, clause) in &indexed {
            if !clause_matches(clause, &row[*idx])? {
                keep = false;
                break;
            }
        }
        if keep {
            rows.push(row.clone());
        }
    }

    Ok(Table::new(table.columns.clone(), rows))
}

fn clause_matches(clause: &FilterClause, cell: &Value) -> ExtractResult<bool> {
    match clause.op {
        FilterOp::Eq | FilterOp::Ne => {
            if cell.is_null() {
                // Vacuous: a null never equals nor differs from a literal.
                return Ok(false);
            }
            let rendered = cell.render();
            let in_set = clause.values.iter().any(|v| v == &rendered);
            Ok(if clause.op == FilterOp::Eq { in_set } else { !in_set })
        }
        FilterOp::Gt | FilterOp::Lt | FilterOp::Ge | FilterOp::Le => {
            if cell.is_null() {
                return Ok(false);
            }
            let literal = &clause.values[0];
            let rhs = literal
                .trim()
                .parse::<f64>()
                .map_err(|_| conversion_error(clause, literal))?;
            let lhs = cell
                .as_number()
                .ok_or_else(|| conversion_error(clause, &cell.render()))?;
            Ok(match clause.op {
                FilterOp::Gt => lhs > rhs,
                FilterOp::Lt => lhs < rhs,
                FilterOp::Ge => lhs >= rhs,
                FilterOp::Le => lhs <= rhs,
                _ => unreachable!("non-comparison op handled earlier"),
            })
        }
        FilterOp::Match => {
            if cell.is_null() {
                return Ok(false);
            }
            let pattern = clause
                .pattern
                .as_ref()
                .expect("match clause carries a compiled pattern");
            Ok(pattern.is_match(&cell.render()))
        }
    }
}

fn conversion_error(clause: &FilterClause, literal: &str) -> ExtractError {
    ExtractError::NumericConversion {
        field: clause.field.clone(),
        literal: literal.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parse_filter;

    fn sample_table() -> Table {
        Table::new(
            vec!["id".to_string(), "status".to_string(), "age".to_string()],
            vec![
                vec![
                    Value::Str("1".to_string()),
                    Value::Str("active".to_string()),
                    Value::Str("31".to_string()),
                ],
                vec![
                    Value::Str("2".to_string()),
                    Value::Str("inactive".to_string()),
                    Value::Str("25".to_string()),
                ],
                vec![Value::Str("3".to_string()), Value::Null, Value::Num(40.0)],
            ],
        )
    }

    #[test]
    fn equality_keeps_matching_rows_only() {
        let t = sample_table();
        let clauses = vec![parse_filter("status=active").unwrap()];
        let out = apply_filters(&t, &clauses).unwrap();
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows[0][0], Value::Str("1".to_string()));
    }

    #[test]
    fn value_set_means_any_of() {
        let t = sample_table();
        let clauses = vec![parse_filter("status=active,inactive").unwrap()];
        let out = apply_filters(&t, &clauses).unwrap();
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn null_cells_are_excluded_under_both_equality_ops() {
        let t = sample_table();
        let eq = apply_filters(&t, &[parse_filter("status=x").unwrap()]).unwrap();
        assert_eq!(eq.row_count(), 0);
        // Row 3 has a null status: excluded even under !=.
        let ne = apply_filters(&t, &[parse_filter("status!=x").unwrap()]).unwrap();
        assert_eq!(ne.row_count(), 2);
    }

    #[test]
    fn comparison_coerces_both_sides() {
        let t = sample_table();
        let out = apply_filters(&t, &[parse_filter("age>30").unwrap()]).unwrap();
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn non_numeric_cell_under_comparison_is_fatal() {
        let t = Table::new(
            vec!["age".to_string()],
            vec![vec![Value::Str("thirty".to_string())]],
        );
        let err = apply_filters(&t, &[parse_filter("age>30").unwrap()]).unwrap_err();
        assert!(matches!(err, ExtractError::NumericConversion { .. }));
    }

    #[test]
    fn unknown_field_is_fatal() {
        let t = sample_table();
        let err = apply_filters(&t, &[parse_filter("nope=1").unwrap()]).unwrap_err();
        assert!(matches!(err, ExtractError::FieldNotFound { .. }));
    }

    #[test]
    fn clauses_combine_with_and() {
        let t = sample_table();
        let clauses = vec![
            parse_filter("status=active,inactive").unwrap(),
            parse_filter("age<30").unwrap(),
        ];
        let out = apply_filters(&t, &clauses).unwrap();
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows[0][0], Value::Str("2".to_string()));
    }

    #[test]
    fn regex_search_matches_substrings() {
        let t = sample_table();
        let out = apply_filters(&t, &[parse_filter("status~act").unwrap()]).unwrap();
        // "act" occurs in both "active" and "inactive".
        assert_eq!(out.row_count(), 2);
    }
}
