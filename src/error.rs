use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared by the format reader, every ingestor, the archive
/// expansion and metadata persistence.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. directory not listable, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The extension is not one the factory or the reader knows about.
    #[error("unsupported file type: '{extension}'")]
    UnsupportedFormat { extension: String },

    /// The file's extension does not match the ingestor invoked on it.
    #[error("invalid extension for {}: expected one of {expected:?}", .path.display())]
    InvalidExtension {
        path: PathBuf,
        expected: &'static [&'static str],
    },

    /// The target path does not exist.
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// A ZIP archive yielded no eligible members.
    #[error("no eligible files found within archive {}", .path.display())]
    EmptyArchive { path: PathBuf },

    /// The file's content does not match its declared format.
    #[error("failed to parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// The file could not be opened or expanded as a ZIP archive.
    #[error("failed to expand archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A reload recipe is missing an argument or carries an invalid one.
    #[error("invalid reload recipe: {message}")]
    InvalidRecipe { message: String },

    /// Metadata could not be (de)serialized.
    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Support for the format was compiled out.
    #[error("format support disabled (enable cargo feature '{feature}')")]
    FeatureDisabled { feature: &'static str },
}

/// Underlying decode failure wrapped by [`IngestionError::ParseError`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// I/O error while reading the file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV / delimited text decode error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decode error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet decode error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[cfg(feature = "excel")]
    /// Excel decode error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The content decoded, but is not tabular in the expected way.
    #[error("{message}")]
    Shape { message: String },
}

impl DecodeError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }
}
