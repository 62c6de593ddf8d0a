//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`IngestorFactory`] (or [`crate::pipeline::run`] for a whole
//! directory), which:
//!
//! - picks an [`Ingestor`] by file extension
//! - reads the file with the format reader ([`read_file`]) into an in-memory
//!   [`crate::types::Table`]
//! - describes it as [`crate::metadata::FileMetadata`], expanding ZIP archives member by member
//! - optionally reports success/failure/warnings to an [`IngestionObserver`]
//!
//! Format-specific decoders are also available under:
//! - [`csv`] (also used for tab-delimited `.txt`)
//! - [`json`]
//! - [`parquet`]
//! - `excel` (Cargo feature `excel`, on by default)

pub mod archive;
pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod factory;
pub mod ingestors;
pub mod json;
pub mod observability;
pub mod options;
pub mod parquet;
pub mod reader;

use std::path::Path;

pub use archive::{ArchiveIngest, ZipIngestor, DEFAULT_EXTRACTION_DIR};
pub use factory::{IngestorFactory, SUPPORTED_EXTENSIONS};
pub use ingestors::{CsvIngestor, ExcelIngestor, Ingested, Ingestor, JsonIngestor, ParquetIngestor, TxtIngestor};
pub use observability::{
    severity_for_error, CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity,
    IngestionStats, IngestionWarning, TracingObserver,
};
pub use options::IngestionOptions;
pub use reader::{read_file, ReaderId};

/// Dotted extension of `path` (`"data/sales.csv"` → `".csv"`), or `""` when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Whether a directory entry should be considered at all: hidden (`.`) and reserved (`_`)
/// names are skipped.
pub fn is_eligible_name(name: &str) -> bool {
    !name.starts_with('.') && !name.starts_with('_')
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
