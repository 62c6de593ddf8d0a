//! Per-format ingestors.
//!
//! Each tabular ingestor validates its input path, delegates to [`read_file`], and turns the
//! decoded table into a [`FileMetadata`]. They differ only in which extensions they accept and
//! which [`FileType`] they record, so the work lives in one shared function.

use std::fmt;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::metadata::FileMetadata;
use crate::types::FileType;

use super::archive::ArchiveIngest;
use super::observability::{IngestionContext, IngestionStats, IngestionWarning};
use super::options::IngestionOptions;
use super::reader::read_file;
use super::{extension_of, file_name_of};

/// Result of running an [`Ingestor`] on one path.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingested {
    /// A single tabular file.
    File(FileMetadata),
    /// An archive expanded into zero or more members.
    Archive(ArchiveIngest),
}

impl Ingested {
    /// Flatten into the metadata entries this ingestion produced.
    pub fn into_metadata(self) -> Vec<FileMetadata> {
        match self {
            Self::File(md) => vec![md],
            Self::Archive(archive) => archive.members,
        }
    }

    /// Warnings recorded while ingesting (only archives produce any).
    pub fn warnings(&self) -> &[IngestionWarning] {
        match self {
            Self::File(_) => &[],
            Self::Archive(archive) => &archive.warnings,
        }
    }
}

/// Capability shared by every ingestor variant returned from
/// [`super::factory::IngestorFactory::get_ingestor`].
pub trait Ingestor: Send + Sync + fmt::Debug {
    /// Dotted extensions this ingestor accepts (`".csv"`, ...).
    fn accepted_extensions(&self) -> &'static [&'static str];

    /// Ingest `path`.
    ///
    /// # Errors
    ///
    /// - [`IngestionError::InvalidExtension`] if the path's extension is not accepted
    /// - [`IngestionError::FileNotFound`] if the path does not exist
    /// - any reader / archive error for the file itself
    fn ingest(&self, path: &Path) -> IngestionResult<Ingested>;
}

pub(crate) fn check_path(path: &Path, accepted: &'static [&'static str]) -> IngestionResult<()> {
    let ext = extension_of(path);
    if !accepted.contains(&ext.as_str()) {
        return Err(IngestionError::InvalidExtension {
            path: path.to_path_buf(),
            expected: accepted,
        });
    }
    if !path.exists() {
        return Err(IngestionError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Read `path` as `file_type` and describe it. No pre-checks.
pub(crate) fn describe_file(path: &Path, file_type: FileType) -> IngestionResult<FileMetadata> {
    let (table, recipe) = read_file(path, file_type.extension())?;
    Ok(FileMetadata::from_table(file_name_of(path), file_type, &table, recipe))
}

pub(crate) fn stats_for(md: &FileMetadata) -> IngestionStats {
    IngestionStats {
        rows: md.row_count,
        columns: md.columns.len(),
    }
}

fn ingest_tabular(
    path: &Path,
    accepted: &'static [&'static str],
    file_type: FileType,
    options: &IngestionOptions,
) -> IngestionResult<FileMetadata> {
    let ctx = IngestionContext::new(path, extension_of(path));
    let result = check_path(path, accepted).and_then(|()| describe_file(path, file_type));

    match &result {
        Ok(md) => options.report_success(&ctx, stats_for(md)),
        Err(e) => {
            options.report_failure(&ctx, e);
        }
    }
    result
}

/// Ingests comma-separated `.csv` files.
#[derive(Debug, Clone, Default)]
pub struct CsvIngestor {
    options: IngestionOptions,
}

impl CsvIngestor {
    const EXTENSIONS: &'static [&'static str] = &[".csv"];

    /// Create an ingestor reporting to `options.observer`.
    pub fn new(options: IngestionOptions) -> Self {
        Self { options }
    }

    /// Ingest one CSV file.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> IngestionResult<FileMetadata> {
        ingest_tabular(path.as_ref(), Self::EXTENSIONS, FileType::Csv, &self.options)
    }
}

impl Ingestor for CsvIngestor {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        Self::EXTENSIONS
    }

    fn ingest(&self, path: &Path) -> IngestionResult<Ingested> {
        self.ingest_file(path).map(Ingested::File)
    }
}

/// Ingests the first sheet of `.xlsx` (and legacy `.xls`) workbooks.
///
/// Both extensions are recorded as [`FileType::Xlsx`], so an `.xls` input yields metadata whose
/// `file_type` is `".xlsx"` while its `file_name` keeps the `.xls` suffix. This is the one
/// ingestor whose recorded type can differ from the file's own extension.
#[derive(Debug, Clone, Default)]
pub struct ExcelIngestor {
    options: IngestionOptions,
}

impl ExcelIngestor {
    const EXTENSIONS: &'static [&'static str] = &[".xlsx", ".xls"];

    /// Create an ingestor reporting to `options.observer`.
    pub fn new(options: IngestionOptions) -> Self {
        Self { options }
    }

    /// Ingest one workbook.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> IngestionResult<FileMetadata> {
        ingest_tabular(path.as_ref(), Self::EXTENSIONS, FileType::Xlsx, &self.options)
    }
}

impl Ingestor for ExcelIngestor {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        Self::EXTENSIONS
    }

    fn ingest(&self, path: &Path) -> IngestionResult<Ingested> {
        self.ingest_file(path).map(Ingested::File)
    }
}

/// Ingests `.parquet` files.
#[derive(Debug, Clone, Default)]
pub struct ParquetIngestor {
    options: IngestionOptions,
}

impl ParquetIngestor {
    const EXTENSIONS: &'static [&'static str] = &[".parquet"];

    /// Create an ingestor reporting to `options.observer`.
    pub fn new(options: IngestionOptions) -> Self {
        Self { options }
    }

    /// Ingest one Parquet file.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> IngestionResult<FileMetadata> {
        ingest_tabular(path.as_ref(), Self::EXTENSIONS, FileType::Parquet, &self.options)
    }
}

impl Ingestor for ParquetIngestor {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        Self::EXTENSIONS
    }

    fn ingest(&self, path: &Path) -> IngestionResult<Ingested> {
        self.ingest_file(path).map(Ingested::File)
    }
}

/// Ingests record-oriented `.json` files.
#[derive(Debug, Clone, Default)]
pub struct JsonIngestor {
    options: IngestionOptions,
}

impl JsonIngestor {
    const EXTENSIONS: &'static [&'static str] = &[".json"];

    /// Create an ingestor reporting to `options.observer`.
    pub fn new(options: IngestionOptions) -> Self {
        Self { options }
    }

    /// Ingest one JSON file.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> IngestionResult<FileMetadata> {
        ingest_tabular(path.as_ref(), Self::EXTENSIONS, FileType::Json, &self.options)
    }
}

impl Ingestor for JsonIngestor {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        Self::EXTENSIONS
    }

    fn ingest(&self, path: &Path) -> IngestionResult<Ingested> {
        self.ingest_file(path).map(Ingested::File)
    }
}

/// Ingests tab-delimited `.txt` files.
#[derive(Debug, Clone, Default)]
pub struct TxtIngestor {
    options: IngestionOptions,
}

impl TxtIngestor {
    const EXTENSIONS: &'static [&'static str] = &[".txt"];

    /// Create an ingestor reporting to `options.observer`.
    pub fn new(options: IngestionOptions) -> Self {
        Self { options }
    }

    /// Ingest one tab-delimited file.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> IngestionResult<FileMetadata> {
        ingest_tabular(path.as_ref(), Self::EXTENSIONS, FileType::Txt, &self.options)
    }
}

impl Ingestor for TxtIngestor {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        Self::EXTENSIONS
    }

    fn ingest(&self, path: &Path) -> IngestionResult<Ingested> {
        self.ingest_file(path).map(Ingested::File)
    }
}
