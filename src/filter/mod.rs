//! Filter predicate engine.
//!
//! A filter is written as `field<op>value[,value...]` and parsed into a
//! [`FilterClause`]. Clauses combine with AND semantics; there is no OR and
//! no grouping. See [`parse::parse_filter`] and [`apply::apply_filters`].

pub mod apply;
pub mod parse;

use std::fmt;

use regex::Regex;

pub use apply::apply_filters;
pub use parse::{parse_filter, parse_filters};

/// Filter operators, longest token first where prefixes overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `>=` numeric greater-or-equal.
    Ge,
    /// `<=` numeric less-or-equal.
    Le,
    /// `!=` string inequality against a value-set.
    Ne,
    /// `=` string equality against a value-set ("any of").
    Eq,
    /// `>` numeric greater-than.
    Gt,
    /// `<` numeric less-than.
    Lt,
    /// `~` regex search.
    Match,
}

impl FilterOp {
    /// The operator's source token.
    pub fn token(&self) -> &'static str {
        match self {
            FilterOp::Ge => ">=",
            FilterOp::Le => "<=",
            FilterOp::Ne => "!=",
            FilterOp::Eq => "=",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::Match => "~",
        }
    }

    /// True for `>`, `<`, `>=`, `<=`.
    pub fn is_comparison(&self) -> bool {
        matches!(self, FilterOp::Gt | FilterOp::Lt | FilterOp::Ge | FilterOp::Le)
    }
}

/// One parsed `(field, operator, values)` predicate.
///
/// `pattern` is populated for [`FilterOp::Match`]; the regex is compiled at
/// parse time so invalid patterns fail before any row is evaluated.
#[derive(Debug, Clone)]
pub struct FilterClause {
    /// Column the clause applies to.
    pub field: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Literal value-set; a single element except for `=`/`!=`.
    pub values: Vec<String>,
    /// Compiled pattern for `~`.
    pub pattern: Option<Regex>,
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.op.token(), self.values.join(","))
    }
}

/// Human-readable description of active filters, clauses joined by `; `.
///
/// Used by the row projector to tag `single`-layout output.
pub fn describe_filters(clauses: &[FilterClause]) -> String {
    clauses
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_joins_clauses() {
        let clauses = vec![
            parse_filter("status=active,pending").unwrap(),
            parse_filter("age>=30").unwrap(),
        ];
        assert_eq!(describe_filters(&clauses), "status=active,pending; age>=30");
    }
}
