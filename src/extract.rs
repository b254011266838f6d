//! Unique-value extraction: explode, deduplicate, sort.

use std::collections::BTreeSet;

use crate::error::ExtractResult;
use crate::types::{Table, Value};

/// Options for [`extract_unique`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Separator used to explode multi-valued cells; `None` disables
    /// explosion.
    pub separator: Option<String>,
    /// Remove the empty string (null-origin placeholders and genuinely empty
    /// sub-values) from the result.
    pub drop_na: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            separator: Some(";".to_string()),
            drop_na: false,
        }
    }
}

/// The ordered, deduplicated value set of the target field.
///
/// Values are trimmed strings. `numeric_sort` records which comparator was
/// used; it is never mixed within one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Sorted unique values.
    pub values: Vec<String>,
    /// True when every value parsed as a finite number and numeric ascending
    /// order was used; false means codepoint order.
    pub numeric_sort: bool,
}

impl ExtractionResult {
    /// Number of unique values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no values survived filtering/deduplication.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extract the deduplicated, sorted values of `field` from a (filtered) table.
///
/// Null cells contribute the empty-string placeholder, which `drop_na`
/// removes along with empty sub-values. Multi-valued cells are exploded on
/// the separator and each sub-value trimmed. Sorting is numeric ascending
/// when every value parses as a finite number, else codepoint ascending.
pub fn extract_unique(
    table: &Table,
    field: &str,
    options: &ExtractOptions,
) -> ExtractResult<ExtractionResult> {
    let idx = table.require_column(field)?;

    let mut set: BTreeSet<String> = BTreeSet::new();
    for row in &table.rows {
        match &row[idx] {
            Value::Null => {
                set.insert(String::new());
            }
            cell => {
                let rendered = cell.render();
                match options.separator.as_deref() {
                    Some(sep) if rendered.contains(sep) => {
                        for part in rendered.split(sep) {
                            set.insert(part.trim().to_string());
                        }
                    }
                    _ => {
                        set.insert(rendered.trim().to_string());
                    }
                }
            }
        }
    }

    if options.drop_na {
        set.remove("");
    }

    Ok(sort_values(set))
}

// BTreeSet iteration already gives codepoint order; numeric order is applied
// only when every value qualifies, so the two comparators never mix.
fn sort_values(set: BTreeSet<String>) -> ExtractionResult {
    let values: Vec<String> = set.into_iter().collect();

    let parsed: Option<Vec<f64>> = values
        .iter()
        .map(|v| v.parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect();

    match parsed {
        Some(numbers) if !values.is_empty() => {
            let mut pairs: Vec<(f64, String)> = numbers.into_iter().zip(values).collect();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("finite numbers are ordered"));
            ExtractionResult {
                values: pairs.into_iter().map(|(_, v)| v).collect(),
                numeric_sort: true,
            }
        }
        _ => ExtractionResult {
            values,
            numeric_sort: false,
        },
    }
}
