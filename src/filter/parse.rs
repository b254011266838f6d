//! Filter-expression parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ExtractError, ExtractResult};

use super::{FilterClause, FilterOp};

// Ordered alternation: two-character operators before their one-character
// prefixes, so `age>=30` never parses as `age> =30`.
static FILTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)(>=|<=|!=|=|>|<|~)(.+)$").expect("filter grammar regex"));

/// Parse one `field<op>value[,value...]` expression into a [`FilterClause`].
///
/// Rules:
/// - `=`/`!=` split the value segment on `,` into a value-set.
/// - `>`, `<`, `>=`, `<=` require exactly one literal.
/// - `~` compiles its literal as a regex here, so a bad pattern fails at
///   parse time rather than mid-evaluation.
pub fn parse_filter(expression: &str) -> ExtractResult<FilterClause> {
    let expr = expression.trim();
    let caps = FILTER_RE
        .captures(expr)
        .ok_or_else(|| syntax_error(expression, "expected field<op>value"))?;

    let field = caps[1].trim().to_string();
    if field.is_empty() {
        return Err(syntax_error(expression, "empty field name"));
    }

    let op = match &caps[2] {
        ">=" => FilterOp::Ge,
        "<=" => FilterOp::Le,
        "!=" => FilterOp::Ne,
        "=" => FilterOp::Eq,
        ">" => FilterOp::Gt,
        "<" => FilterOp::Lt,
        "~" => FilterOp::Match,
        other => return Err(syntax_error(expression, &format!("unknown operator '{other}'"))),
    };

    let values: Vec<String> = if matches!(op, FilterOp::Eq | FilterOp::Ne) {
        caps[3]
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    } else {
        vec![caps[3].trim().to_string()]
    };

    if values.is_empty() {
        return Err(syntax_error(expression, "no values after operator"));
    }
    if op.is_comparison() && values[0].contains(',') {
        return Err(syntax_error(
            expression,
            "comparison operators take a single literal",
        ));
    }

    let pattern = if op == FilterOp::Match {
        let pat = Regex::new(&values[0])
            .map_err(|e| syntax_error(expression, &format!("invalid regex: {e}")))?;
        Some(pat)
    } else {
        None
    };

    Ok(FilterClause {
        field,
        op,
        values,
        pattern,
    })
}

/// Parse a list of raw filter expressions, failing on the first bad one.
pub fn parse_filters(expressions: &[String]) -> ExtractResult<Vec<FilterClause>> {
    expressions.iter().map(|e| parse_filter(e)).collect()
}

fn syntax_error(expression: &str, message: &str) -> ExtractError {
    ExtractError::InvalidFilterSyntax {
        expression: expression.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_char_operators_win_over_prefixes() {
        let c = parse_filter("age>=30").unwrap();
        assert_eq!(c.op, FilterOp::Ge);
        assert_eq!(c.values, vec!["30".to_string()]);

        let c = parse_filter("age>30").unwrap();
        assert_eq!(c.op, FilterOp::Gt);

        let c = parse_filter("status!=closed").unwrap();
        assert_eq!(c.op, FilterOp::Ne);
    }

    #[test]
    fn equality_splits_value_set_on_comma() {
        let c = parse_filter("status=active, pending ,").unwrap();
        assert_eq!(c.op, FilterOp::Eq);
        assert_eq!(c.values, vec!["active".to_string(), "pending".to_string()]);
    }

    #[test]
    fn comparison_rejects_multiple_literals() {
        let err = parse_filter("age>30,40").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidFilterSyntax { .. }));
    }

    #[test]
    fn missing_operator_is_a_syntax_error() {
        let err = parse_filter("just a field").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidFilterSyntax { .. }));
    }

    #[test]
    fn empty_field_is_a_syntax_error() {
        // `  =x` has only whitespace before the operator.
        let err = parse_filter("  =x").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidFilterSyntax { .. }));
    }

    #[test]
    fn bad_regex_fails_at_parse_time() {
        let err = parse_filter("name~[unclosed").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid regex"));
    }

    #[test]
    fn match_operator_compiles_pattern() {
        let c = parse_filter("email~@example\\.com$").unwrap();
        assert_eq!(c.op, FilterOp::Match);
        assert!(c.pattern.unwrap().is_match("ada@example.com"));
    }
}
