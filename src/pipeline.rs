//! Batch entry point: ingest every file in a source directory and persist the metadata.
//!
//! One bad file never aborts the run (unless [`IngestionOptions::fail_fast`] is set): it is
//! recorded as a [`FileFailure`] and the remaining files are still processed. Unsupported
//! files and metadata write problems are [`IngestionWarning`]s.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::PathConfig;
use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::{
    extension_of, is_eligible_name, severity_for_error, IngestionOptions, IngestionSeverity, IngestionWarning,
    IngestorFactory,
};
use crate::metadata::{save_metadata, MetadataBatch, METADATA_FILE_NAME};

/// A top-level file that could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// The file.
    pub path: PathBuf,
    /// Severity as classified for observers.
    pub severity: IngestionSeverity,
    /// Error message naming the file and the underlying cause.
    pub message: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Metadata for every successfully ingested file, archive members flattened in.
    pub batch: MetadataBatch,
    /// Skipped files, failed archive members, and a failed metadata write.
    pub warnings: Vec<IngestionWarning>,
    /// Top-level files that failed.
    pub failures: Vec<FileFailure>,
    /// Where `metadata.json` was written; `None` if writing failed.
    pub metadata_path: Option<PathBuf>,
}

/// Ingest every eligible file in `paths.source_dir` and write `metadata.json` to
/// `paths.metadata_dir`.
///
/// Files are visited in file-name order. Directories and names starting with `.` or `_` are
/// skipped.
///
/// # Errors
///
/// - [`IngestionError::FileNotFound`] if the source directory does not exist
/// - [`IngestionError::Io`] if it cannot be listed
/// - with `fail_fast`, the first top-level file failure
pub fn run(paths: &PathConfig, options: &IngestionOptions) -> IngestionResult<RunReport> {
    let factory = IngestorFactory::new(options.clone()).with_extraction_dir(&paths.extraction_dir);
    let mut report = RunReport::default();

    for path in list_source_files(&paths.source_dir)? {
        let extension = extension_of(&path);
        let ingestor = match factory.get_ingestor(&extension) {
            Ok(ingestor) => ingestor,
            Err(_) => {
                let warning = IngestionWarning::UnsupportedFormat { path, extension };
                options.report_warning(&warning);
                report.warnings.push(warning);
                continue;
            }
        };

        match ingestor.ingest(&path) {
            Ok(ingested) => {
                report.warnings.extend_from_slice(ingested.warnings());
                report.batch.extend(ingested.into_metadata());
            }
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => report.failures.push(FileFailure {
                severity: severity_for_error(&e),
                message: e.to_string(),
                path,
            }),
        }
    }

    match save_metadata(&report.batch, &paths.metadata_dir) {
        Ok(written) => report.metadata_path = Some(written),
        Err(e) => {
            let warning = IngestionWarning::MetadataWriteFailed {
                path: paths.metadata_dir.join(METADATA_FILE_NAME),
                message: e.to_string(),
            };
            options.report_warning(&warning);
            report.warnings.push(warning);
        }
    }

    tracing::debug!(
        entries = report.batch.len(),
        warnings = report.warnings.len(),
        failures = report.failures.len(),
        "run finished"
    );
    Ok(report)
}

fn list_source_files(source_dir: &Path) -> IngestionResult<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        return Err(IngestionError::FileNotFound {
            path: source_dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(source_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let name = entry.file_name().to_string_lossy();
        if !is_eligible_name(&name) {
            continue;
        }
        if !entry.path().is_file() {
            tracing::debug!(path = %entry.path().display(), "skipping non-file entry");
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}
