//! End-to-end pipeline: read → filter → extract → project → write.
//!
//! Each run is a pure function of (input file, filter list, configuration);
//! nothing persists across runs. Stage timings, row counts, and an RSS delta
//! are reported through the optional [`PipelineObserver`] and summarized in
//! [`PipelineSummary`] for diagnostics only.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ExtractorConfig;
use crate::error::ExtractResult;
use crate::extract::{extract_unique, ExtractOptions, ExtractionResult};
use crate::filter::{apply_filters, describe_filters, parse_filters};
use crate::observe::{severity_for_error, PipelineObserver, Stage, StageStats};
use crate::project::project;
use crate::reader::{read_table_from_path, ReadOptions};
use crate::types::Table;
use crate::writer::{write_table, WriteOptions};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Rows loaded from the input file.
    pub rows_read: usize,
    /// Rows surviving the filter stage.
    pub rows_after_filter: usize,
    /// Unique values extracted.
    pub unique_count: usize,
    /// Total wall-clock time.
    pub elapsed: Duration,
    /// Resident-set-size change over the run, when the platform exposes it.
    pub rss_delta_bytes: Option<i64>,
}

/// Run the whole extraction pipeline for `config`.
///
/// Failures are reported to the observer (with severity and an alert at
/// `Critical`) before being returned; the caller decides what to do with
/// them. The process is never terminated from here.
pub fn run_pipeline(
    config: &ExtractorConfig,
    observer: Option<Arc<dyn PipelineObserver>>,
) -> ExtractResult<PipelineSummary> {
    config.validate()?;
    let started = Instant::now();
    let rss_before = current_rss_bytes();

    let result = run_stages(config, observer.as_ref());
    match result {
        Ok((rows_read, rows_after_filter, unique_count)) => Ok(PipelineSummary {
            rows_read,
            rows_after_filter,
            unique_count,
            elapsed: started.elapsed(),
            rss_delta_bytes: match (rss_before, current_rss_bytes()) {
                (Some(before), Some(after)) => Some(after as i64 - before as i64),
                _ => None,
            },
        }),
        Err((stage, e)) => {
            if let Some(obs) = observer.as_ref() {
                let severity = severity_for_error(&e);
                obs.on_failure(stage, severity, &e);
                if severity >= crate::observe::PipelineSeverity::Critical {
                    obs.on_alert(stage, severity, &e);
                }
            }
            Err(e)
        }
    }
}

type StageError = (Stage, crate::error::ExtractError);

fn run_stages(
    config: &ExtractorConfig,
    observer: Option<&Arc<dyn PipelineObserver>>,
) -> Result<(usize, usize, usize), StageError> {
    let run =
        |stage: Stage, f: &mut dyn FnMut() -> ExtractResult<usize>| -> Result<usize, StageError> {
            if let Some(obs) = observer {
                obs.on_stage_start(stage);
            }
            let started = Instant::now();
            let rows = f().map_err(|e| (stage, e))?;
            if let Some(obs) = observer {
                obs.on_stage_end(
                    stage,
                    StageStats {
                        rows,
                        elapsed: started.elapsed(),
                    },
                );
            }
            Ok(rows)
        };

    // Read + flatten.
    let mut table: Option<Table> = None;
    let rows_read = run(Stage::Read, &mut || {
        let opts = ReadOptions {
            format: None,
            delimiter: Some(config.delimiter_byte()?),
            observer: observer.cloned(),
        };
        let t = read_table_from_path(&config.input_file, &opts)?;
        let n = t.row_count();
        table = Some(t);
        Ok(n)
    })?;
    let table = table.expect("read stage populated the table");

    // Filter.
    let clauses = parse_filters(&config.filters).map_err(|e| (Stage::Filter, e))?;
    let mut filtered: Option<Table> = None;
    let rows_after_filter = run(Stage::Filter, &mut || {
        let t = apply_filters(&table, &clauses)?;
        let n = t.row_count();
        filtered = Some(t);
        Ok(n)
    })?;
    let filtered = filtered.expect("filter stage populated the table");

    // Extract.
    let mut extraction: Option<ExtractionResult> = None;
    let unique_count = run(Stage::Extract, &mut || {
        let opts = ExtractOptions {
            separator: Some(config.separator.clone()),
            drop_na: config.drop_na,
        };
        let r = extract_unique(&filtered, &config.unique_field, &opts)?;
        let n = r.len();
        extraction = Some(r);
        Ok(n)
    })?;
    let extraction = extraction.expect("extract stage populated the result");

    // Project.
    let mut projected: Option<Table> = None;
    run(Stage::Project, &mut || {
        let t = project(
            &extraction,
            config.row_format,
            config.output_column(),
            &config.separator,
            &describe_filters(&clauses),
        );
        let n = t.row_count();
        projected = Some(t);
        Ok(n)
    })?;
    let projected = projected.expect("project stage populated the table");

    // Write (or dry-run preview).
    run(Stage::Write, &mut || {
        let opts = WriteOptions {
            format: config.output_format,
            delimiter: config.delimiter_byte()?,
            dry_run: config.dry_run,
        };
        write_table(&projected, &config.output_file, &opts)?;
        Ok(projected.row_count())
    })?;

    Ok((rows_read, rows_after_filter, unique_count))
}

/// Load just the table for a config, for the interactive boundary.
///
/// The prompt layer calls this once, then uses
/// [`Table::column_names`] and [`Table::distinct_raw_values`] between
/// prompts while it assembles the rest of the configuration.
pub fn load_table(config: &ExtractorConfig) -> ExtractResult<Table> {
    let opts = ReadOptions {
        format: None,
        delimiter: Some(config.delimiter_byte()?),
        observer: None,
    };
    read_table_from_path(&config.input_file, &opts)
}

/// Current resident set size in bytes, when the platform exposes it.
///
/// Linux-only (`/proc/self/statm`); other platforms report `None`. Purely
/// diagnostic.
pub fn current_rss_bytes() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let rss_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
        Some(rss_pages * 4096)
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
