use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Error type shared across the whole pipeline.
///
/// Row-level decode problems are *not* represented here: they are reported to
/// the configured [`crate::observe::PipelineObserver`] and the offending row
/// is skipped. Everything in this enum aborts the current stage.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input file does not exist or is not a regular file.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The input or output format could not be determined or is not supported.
    #[error("unsupported format: {detail}")]
    UnsupportedFormat { detail: String },

    /// The file is structurally invalid (unparsable header, corrupt footer,
    /// document that is neither an object nor an array, ...).
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A filter expression does not match the `field<op>value[,value...]` grammar.
    #[error("invalid filter '{expression}': {message}")]
    InvalidFilterSyntax { expression: String, message: String },

    /// A filter or extraction referenced a column that is not in the table.
    #[error("field '{field}' not found (available: {available})")]
    FieldNotFound { field: String, available: String },

    /// A comparison filter hit a value that cannot be coerced to a number.
    #[error("cannot convert '{literal}' to a number for comparison on field '{field}'")]
    NumericConversion { field: String, literal: String },

    /// Writing the output file failed.
    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or incomplete configuration.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Underlying I/O error (permission denied, unreadable file, ...).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Process exit category for this error, per the boundary-layer
    /// convention: 1 configuration, 2 input, 3 processing, 4 output.
    ///
    /// The library itself never terminates the process; callers (the CLI)
    /// map this to an actual exit code, using 99 for anything unexpected.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExtractError::Config { .. } | ExtractError::InvalidFilterSyntax { .. } => 1,
            ExtractError::FileNotFound { .. }
            | ExtractError::UnsupportedFormat { .. }
            | ExtractError::Parse { .. }
            | ExtractError::Io(_) => 2,
            ExtractError::FieldNotFound { .. } | ExtractError::NumericConversion { .. } => 3,
            ExtractError::OutputWrite { .. } => 4,
        }
    }
}
