//! Pipeline configuration.
//!
//! The core never touches the environment or argument list; the boundary
//! layer (CLI or interactive prompt flow) hands it a fully-populated
//! [`ExtractorConfig`]. Configs can also be loaded from a YAML file, with
//! boundary-layer overrides applied field-by-field on top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};

/// Output row layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFormat {
    /// One row; all unique values joined by the separator.
    #[default]
    Single,
    /// One row per unique value.
    Multi,
}

/// Output serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Yaml,
    Parquet,
}

/// Full configuration for one extraction run.
///
/// Defaults: separator `;`, row format `single`, output format `csv`,
/// delimiter `,`, drop-na off, dry-run off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Path to the input file (CSV/TSV, JSON/NDJSON, YAML, Parquet).
    pub input_file: PathBuf,
    /// Path the result is written to (ignored under dry-run).
    pub output_file: PathBuf,
    /// Field whose distinct values are extracted.
    pub unique_field: String,
    /// Raw filter expressions, e.g. `status=active` or `age>=30`.
    #[serde(default)]
    pub filters: Vec<String>,
    /// Separator for multi-valued cells and for the `single` row layout.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Output column name override; defaults to `unique_field`.
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub row_format: RowFormat,
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Delimiter for delimited-text input and CSV output.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Drop null-origin and empty values from the result.
    #[serde(default)]
    pub drop_na: bool,
    /// Print the would-be output instead of writing it.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_separator() -> String {
    ";".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl ExtractorConfig {
    /// Minimal config with all optional fields at their defaults.
    pub fn new(
        input_file: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        unique_field: impl Into<String>,
    ) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: output_file.into(),
            unique_field: unique_field.into(),
            filters: Vec::new(),
            separator: default_separator(),
            column_name: None,
            row_format: RowFormat::default(),
            output_format: OutputFormat::default(),
            delimiter: default_delimiter(),
            drop_na: false,
            dry_run: false,
        }
    }

    /// Load a config from a YAML file.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> ExtractResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ExtractError::Config {
            message: format!("cannot read config {}: {e}", path.display()),
        })?;
        serde_yaml::from_str(&text).map_err(|e| ExtractError::Config {
            message: format!("invalid config {}: {e}", path.display()),
        })
    }

    /// Effective output column name (override or the field itself).
    pub fn output_column(&self) -> &str {
        self.column_name.as_deref().unwrap_or(&self.unique_field)
    }

    /// Input delimiter as a single byte.
    ///
    /// Multi-byte delimiters are rejected; the delimited reader and CSV
    /// writer both operate on single-byte separators.
    pub fn delimiter_byte(&self) -> ExtractResult<u8> {
        let bytes = self.delimiter.as_bytes();
        if bytes.len() != 1 {
            return Err(ExtractError::Config {
                message: format!("delimiter must be one byte, got '{}'", self.delimiter),
            });
        }
        Ok(bytes[0])
    }

    /// Validate the parts of the config the pipeline depends on.
    pub fn validate(&self) -> ExtractResult<()> {
        if self.unique_field.trim().is_empty() {
            return Err(ExtractError::Config {
                message: "unique_field must not be empty".to_string(),
            });
        }
        if self.separator.is_empty() {
            return Err(ExtractError::Config {
                message: "separator must not be empty".to_string(),
            });
        }
        self.delimiter_byte().map(|_| ())
    }
}

/// Sample YAML config, printed by the CLI's `--print-config-template`.
pub const CONFIG_TEMPLATE: &str = "\
input_file: \"input.csv\"
output_file: \"output.csv\"
unique_field: \"email\"
filters:
  - \"status=active\"
separator: \";\"
row_format: \"single\"
output_format: \"csv\"
delimiter: \",\"
drop_na: false
dry_run: false
";
