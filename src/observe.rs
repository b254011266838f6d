//! Structured pipeline events.
//!
//! The core reports stage boundaries, skipped rows, and failures to a
//! [`PipelineObserver`]; observers record logs or metrics but never influence
//! control flow. Built-in observers: [`StdErrObserver`], [`FileObserver`]
//! (append-only, best-effort), and [`CompositeObserver`].

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ExtractError;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Filter,
    Extract,
    Project,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Read => "read",
            Stage::Filter => "filter",
            Stage::Extract => "extract",
            Stage::Project => "project",
            Stage::Write => "write",
        };
        f.write_str(s)
    }
}

/// Severity classification used for observer callbacks and alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. a skipped row).
    Warning,
    /// Error-level event (a stage failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Per-stage stats reported on stage end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStats {
    /// Rows (or values) produced by the stage.
    pub rows: usize,
    /// Wall-clock time spent in the stage.
    pub elapsed: Duration,
}

/// Observer interface for pipeline progress and outcomes.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_start(&self, _stage: Stage) {}

    /// Called when a stage completes successfully.
    fn on_stage_end(&self, _stage: Stage, _stats: StageStats) {}

    /// Called when a row is dropped during decode (recoverable).
    fn on_row_skipped(&self, _stage: Stage, _detail: &str) {}

    /// Called when a stage fails.
    fn on_failure(&self, _stage: Stage, _severity: PipelineSeverity, _error: &ExtractError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, stage: Stage, severity: PipelineSeverity, error: &ExtractError) {
        self.on_failure(stage, severity, error)
    }
}

/// Severity assigned to a pipeline failure, for alert thresholds.
pub fn severity_for_error(e: &ExtractError) -> PipelineSeverity {
    match e {
        ExtractError::Io(_) | ExtractError::OutputWrite { .. } => PipelineSeverity::Critical,
        _ => PipelineSeverity::Error,
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_stage_start(&self, stage: Stage) {
        for o in &self.observers {
            o.on_stage_start(stage);
        }
    }

    fn on_stage_end(&self, stage: Stage, stats: StageStats) {
        for o in &self.observers {
            o.on_stage_end(stage, stats);
        }
    }

    fn on_row_skipped(&self, stage: Stage, detail: &str) {
        for o in &self.observers {
            o.on_row_skipped(stage, detail);
        }
    }

    fn on_failure(&self, stage: Stage, severity: PipelineSeverity, error: &ExtractError) {
        for o in &self.observers {
            o.on_failure(stage, severity, error);
        }
    }

    fn on_alert(&self, stage: Stage, severity: PipelineSeverity, error: &ExtractError) {
        for o in &self.observers {
            o.on_alert(stage, severity, error);
        }
    }
}

/// Logs pipeline events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_stage_end(&self, stage: Stage, stats: StageStats) {
        eprintln!(
            "[extract][{stage}] rows={} elapsed={:.1?}",
            stats.rows, stats.elapsed
        );
    }

    fn on_row_skipped(&self, stage: Stage, detail: &str) {
        eprintln!("[extract][{stage}][skip] {detail}");
    }

    fn on_failure(&self, stage: Stage, severity: PipelineSeverity, error: &ExtractError) {
        eprintln!("[extract][{stage}][{severity:?}] {error}");
    }

    fn on_alert(&self, stage: Stage, severity: PipelineSeverity, error: &ExtractError) {
        eprintln!("[ALERT][extract][{stage}][{severity:?}] {error}");
    }
}

/// Appends pipeline events to a local log file.
///
/// Writes are best-effort; failures to open/write the log file are ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_stage_end(&self, stage: Stage, stats: StageStats) {
        self.append_line(&format!(
            "{} ok stage={stage} rows={} elapsed_ms={}",
            unix_ts(),
            stats.rows,
            stats.elapsed.as_millis()
        ));
    }

    fn on_row_skipped(&self, stage: Stage, detail: &str) {
        self.append_line(&format!("{} skip stage={stage} {detail}", unix_ts()));
    }

    fn on_failure(&self, stage: Stage, severity: PipelineSeverity, error: &ExtractError) {
        self.append_line(&format!(
            "{} fail stage={stage} severity={severity:?} err={error}",
            unix_ts()
        ));
    }

    fn on_alert(&self, stage: Stage, severity: PipelineSeverity, error: &ExtractError) {
        self.append_line(&format!(
            "{} ALERT stage={stage} severity={severity:?} err={error}",
            unix_ts()
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
