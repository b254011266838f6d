//! Thin CLI over the extraction pipeline.
//!
//! All real work happens in the library; this binary parses flags, merges
//! them over an optional YAML config file, and maps the error taxonomy onto
//! exit codes: 0 success, 1 configuration, 2 input, 3 processing, 4 output,
//! 99 unexpected.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use unique_extract::config::{ExtractorConfig, OutputFormat, RowFormat, CONFIG_TEMPLATE};
use unique_extract::error::ExtractError;
use unique_extract::observe::{PipelineObserver, StdErrObserver};
use unique_extract::pipeline::run_pipeline;

/// Extract unique values from tabular data.
#[derive(Parser, Debug)]
#[command(name = "unique-extract")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input file path (CSV, JSON, YAML, Parquet)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Field to extract unique values from
    #[arg(long)]
    unique_field: Option<String>,

    /// Filters in the form field=val, field!=a,b or field>=val
    #[arg(long, num_args = 0..)]
    filters: Vec<String>,

    /// Delimiter for delimited-text input and CSV output
    #[arg(long)]
    delimiter: Option<String>,

    /// Separator for multi-valued cells (e.g. contact_ids)
    #[arg(long)]
    separator: Option<String>,

    /// Override the column name in the output
    #[arg(long)]
    column_name: Option<String>,

    /// Output row layout
    #[arg(long, value_parser = ["single", "multi"])]
    row_format: Option<String>,

    /// Output serialization format
    #[arg(long, value_parser = ["csv", "json", "yaml", "parquet"])]
    output_format: Option<String>,

    /// Drop null-origin and empty values from the result
    #[arg(long)]
    drop_na: bool,

    /// Print the would-be output without writing it
    #[arg(long)]
    dry_run: bool,

    /// Load configuration from a YAML file (flags override file values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a sample YAML config template and exit
    #[arg(long)]
    print_config_template: bool,

    /// Suppress stage logging on stderr
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.print_config_template {
        print!("{CONFIG_TEMPLATE}");
        return ExitCode::SUCCESS;
    }

    let config = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::from(1);
        }
    };

    let observer = if cli.quiet {
        None
    } else {
        Some(Arc::new(StdErrObserver) as Arc<dyn PipelineObserver>)
    };

    match run_pipeline(&config, observer) {
        Ok(summary) => {
            println!(
                "{:.2?} elapsed | {} unique values ({} rows read, {} after filter)",
                summary.elapsed, summary.unique_count, summary.rows_read, summary.rows_after_filter
            );
            if let Some(delta) = summary.rss_delta_bytes {
                eprintln!("memory delta: {delta:+} bytes");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            let code = u8::try_from(e.exit_code()).unwrap_or(99);
            ExitCode::from(code)
        }
    }
}

fn build_config(cli: &Cli) -> Result<ExtractorConfig, ExtractError> {
    let mut config = match &cli.config {
        Some(path) => ExtractorConfig::from_yaml_path(path)?,
        None => {
            let missing = |flag: &str| ExtractError::Config {
                message: format!("--{flag} is required (or use --config)"),
            };
            ExtractorConfig::new(
                cli.input.clone().ok_or_else(|| missing("input"))?,
                cli.output.clone().ok_or_else(|| missing("output"))?,
                cli.unique_field.clone().ok_or_else(|| missing("unique-field"))?,
            )
        }
    };

    // Flags override config-file values field-by-field.
    if let Some(v) = &cli.input {
        config.input_file = v.clone();
    }
    if let Some(v) = &cli.output {
        config.output_file = v.clone();
    }
    if let Some(v) = &cli.unique_field {
        config.unique_field = v.clone();
    }
    if !cli.filters.is_empty() {
        config.filters = cli.filters.clone();
    }
    if let Some(v) = &cli.delimiter {
        config.delimiter = v.clone();
    }
    if let Some(v) = &cli.separator {
        config.separator = v.clone();
    }
    if let Some(v) = &cli.column_name {
        config.column_name = Some(v.clone());
    }
    if let Some(v) = &cli.row_format {
        config.row_format = match v.as_str() {
            "multi" => RowFormat::Multi,
            _ => RowFormat::Single,
        };
    }
    if let Some(v) = &cli.output_format {
        config.output_format = match v.as_str() {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            "parquet" => OutputFormat::Parquet,
            _ => OutputFormat::Csv,
        };
    }
    if cli.drop_na {
        config.drop_na = true;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    config.validate()?;
    Ok(config)
}
