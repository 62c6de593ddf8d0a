use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{DecodeError, IngestionError};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (missing files, I/O and other infrastructure failures).
    Critical,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The path being ingested (for archive members, the extracted path).
    pub path: PathBuf,
    /// Dotted extension that selected the ingestion logic (`".csv"`, `".zip"`, ...).
    pub extension: String,
}

impl IngestionContext {
    pub(crate) fn new(path: &Path, extension: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            extension: extension.into(),
        }
    }
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of parsed rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

/// A non-fatal problem: the file was skipped or an artifact was not written, but the run
/// continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionWarning {
    /// A file (or archive member) has an extension no ingestor handles.
    UnsupportedFormat { path: PathBuf, extension: String },
    /// An archive member failed to parse and was left out of the batch.
    MemberFailed { path: PathBuf, message: String },
    /// The metadata artifact could not be written.
    MetadataWriteFailed { path: PathBuf, message: String },
}

impl IngestionWarning {
    /// The path the warning is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::UnsupportedFormat { path, .. }
            | Self::MemberFailed { path, .. }
            | Self::MetadataWriteFailed { path, .. } => path,
        }
    }
}

impl fmt::Display for IngestionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { path, extension } => write!(
                f,
                "unsupported file type '{extension}': {}. Skipping.",
                path.display()
            ),
            Self::MemberFailed { path, message } => {
                write!(f, "failed to process {}: {message}", path.display())
            }
            Self::MetadataWriteFailed { path, message } => {
                write!(f, "failed to save metadata to {}: {message}", path.display())
            }
        }
    }
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when a file (or archive member) produced metadata.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion of a file fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called for every non-fatal warning.
    fn on_warning(&self, _warning: &IngestionWarning) {}
}

/// Classify an error for observer callbacks and alerting.
///
/// Missing files and I/O failures (including I/O underneath a decode or archive error) are
/// [`IngestionSeverity::Critical`]; everything else is [`IngestionSeverity::Error`].
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) | IngestionError::FileNotFound { .. } => IngestionSeverity::Critical,
        IngestionError::ParseError { source, .. } => match source {
            DecodeError::Io(_) => IngestionSeverity::Critical,
            DecodeError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
                _ => IngestionSeverity::Error,
            },
            // Best-effort: parquet errors often wrap IO, but not always in a structured way.
            DecodeError::Parquet(err) if error_chain_contains_io(err) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Archive { source, .. } => match source {
            zip::result::ZipError::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::UnsupportedFormat { .. }
        | IngestionError::InvalidExtension { .. }
        | IngestionError::EmptyArchive { .. }
        | IngestionError::InvalidRecipe { .. }
        | IngestionError::Metadata(_)
        | IngestionError::FeatureDisabled { .. } => IngestionSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
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

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_warning(&self, warning: &IngestionWarning) {
        for o in &self.observers {
            o.on_warning(warning);
        }
    }
}

/// Emits ingestion events through `tracing`.
///
/// Successes are `info`, warnings `warn`, failures and alerts `error`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            extension = %ctx.extension,
            path = %ctx.path.display(),
            rows = stats.rows,
            columns = stats.columns,
            "ingested"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(
            ?severity,
            extension = %ctx.extension,
            path = %ctx.path.display(),
            %error,
            "ingestion failed"
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(
            alert = true,
            ?severity,
            extension = %ctx.extension,
            path = %ctx.path.display(),
            %error,
            "ingestion alert"
        );
    }

    fn on_warning(&self, warning: &IngestionWarning) {
        tracing::warn!("{warning}");
    }
}

/// Appends ingestion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
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

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append_line(&format!(
            "{} ok extension={} path={} rows={} columns={}",
            unix_ts(),
            ctx.extension,
            ctx.path.display(),
            stats.rows,
            stats.columns
        ));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "{} fail severity={:?} extension={} path={} err={}",
            unix_ts(),
            severity,
            ctx.extension,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} extension={} path={} err={}",
            unix_ts(),
            severity,
            ctx.extension,
            ctx.path.display(),
            error
        ));
    }

    fn on_warning(&self, warning: &IngestionWarning) {
        self.append_line(&format!("{} warn {}", unix_ts(), warning));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{severity_for_error, IngestionSeverity, IngestionWarning};
    use crate::error::{DecodeError, IngestionError};

    #[test]
    fn missing_files_are_critical() {
        let err = IngestionError::FileNotFound {
            path: PathBuf::from("gone.csv"),
        };
        assert_eq!(severity_for_error(&err), IngestionSeverity::Critical);
    }

    #[test]
    fn decode_shape_errors_are_not_critical() {
        let err = IngestionError::ParseError {
            path: PathBuf::from("bad.json"),
            source: DecodeError::shape("row 1 is not a json object"),
        };
        assert_eq!(severity_for_error(&err), IngestionSeverity::Error);
    }

    #[test]
    fn io_underneath_decode_is_critical() {
        let err = IngestionError::ParseError {
            path: PathBuf::from("x.json"),
            source: DecodeError::Io(std::io::Error::other("disk gone")),
        };
        assert_eq!(severity_for_error(&err), IngestionSeverity::Critical);
    }

    #[test]
    fn severities_are_ordered() {
        assert!(IngestionSeverity::Info < IngestionSeverity::Warning);
        assert!(IngestionSeverity::Warning < IngestionSeverity::Error);
        assert!(IngestionSeverity::Error < IngestionSeverity::Critical);
    }

    #[test]
    fn warning_display_names_the_file() {
        let w = IngestionWarning::UnsupportedFormat {
            path: PathBuf::from("bundle/notes.md"),
            extension: ".md".to_string(),
        };
        assert_eq!(w.path(), PathBuf::from("bundle/notes.md").as_path());
        assert!(w.to_string().contains("notes.md"));
        assert!(w.to_string().contains("Skipping"));
    }
}
