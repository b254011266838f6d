//! `unique-extract` answers "what are the distinct X across this data, given
//! condition Y" for ad-hoc data-quality and ETL-validation work.
//!
//! An input file (CSV/TSV, JSON/NDJSON, YAML, or Parquet) is normalized into
//! an in-memory [`types::Table`], optionally filtered by conjunctive
//! `field<op>value` clauses, and the distinct values of one field are
//! deduplicated, sorted, and written back out as CSV, JSON, YAML, or Parquet.
//!
//! The primary entrypoint is [`pipeline::run_pipeline`], driven by an
//! [`config::ExtractorConfig`]:
//!
//! ```no_run
//! use unique_extract::config::ExtractorConfig;
//! use unique_extract::pipeline::run_pipeline;
//!
//! # fn main() -> Result<(), unique_extract::ExtractError> {
//! let mut cfg = ExtractorConfig::new("people.csv", "emails.csv", "email");
//! cfg.filters = vec!["status=active".to_string()];
//! let summary = run_pipeline(&cfg, None)?;
//! println!("{} unique values", summary.unique_count);
//! # Ok(())
//! # }
//! ```
//!
//! Filters support `=`, `!=` (value-sets, "any of"), numeric `>`, `<`, `>=`,
//! `<=`, and regex `~`, combined with AND semantics:
//!
//! ```
//! use unique_extract::filter::{apply_filters, parse_filters};
//! use unique_extract::types::{Table, Value};
//!
//! # fn main() -> Result<(), unique_extract::ExtractError> {
//! let table = Table::new(
//!     vec!["id".to_string(), "status".to_string()],
//!     vec![
//!         vec![Value::Str("1".to_string()), Value::Str("active".to_string())],
//!         vec![Value::Str("2".to_string()), Value::Str("inactive".to_string())],
//!     ],
//! );
//! let clauses = parse_filters(&["status=active".to_string()])?;
//! let filtered = apply_filters(&table, &clauses)?;
//! assert_eq!(filtered.row_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`reader`]: format readers and the unified [`reader::read_table_from_path`]
//! - [`flatten`]: nested-record flattening for JSON/YAML sources
//! - [`filter`]: filter grammar parsing and conjunctive evaluation
//! - [`extract`]: explode/deduplicate/sort of the target field
//! - [`project`]: `single` vs `multi` output layout
//! - [`writer`]: format writers, dry-run preview, atomic file replacement
//! - [`pipeline`]: stage orchestration and introspection for the prompt layer
//! - [`observe`]: structured stage/skip/failure events
//! - [`config`], [`error`], [`types`]: configuration, error taxonomy, data model

pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod flatten;
pub mod observe;
pub mod pipeline;
pub mod project;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::{ExtractError, ExtractResult};
