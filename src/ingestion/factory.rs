//! Extension → ingestor mapping.

use std::path::PathBuf;

use crate::error::{IngestionError, IngestionResult};

use super::archive::{ZipIngestor, DEFAULT_EXTRACTION_DIR};
use super::ingestors::{CsvIngestor, ExcelIngestor, Ingestor, JsonIngestor, ParquetIngestor, TxtIngestor};
use super::options::IngestionOptions;

/// Extensions [`IngestorFactory::get_ingestor`] recognizes.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".zip", ".csv", ".xlsx", ".parquet", ".json", ".txt"];

/// Builds the ingestor for a file extension.
///
/// The factory is immutable once built, so it can be shared and called from any thread.
///
/// ```no_run
/// use std::path::Path;
///
/// use data_ingestor::ingestion::{IngestorFactory, IngestionOptions};
///
/// # fn main() -> Result<(), data_ingestor::IngestionError> {
/// let factory = IngestorFactory::new(IngestionOptions::default()).with_extraction_dir("extracted_data");
/// let ingestor = factory.get_ingestor(".csv")?;
/// let entries = ingestor.ingest(Path::new("data/sales.csv"))?.into_metadata();
/// println!("{} entries", entries.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IngestorFactory {
    options: IngestionOptions,
    extraction_dir: PathBuf,
}

impl Default for IngestorFactory {
    fn default() -> Self {
        Self::new(IngestionOptions::default())
    }
}

impl IngestorFactory {
    /// Create a factory whose ingestors share `options`.
    pub fn new(options: IngestionOptions) -> Self {
        Self {
            options,
            extraction_dir: PathBuf::from(DEFAULT_EXTRACTION_DIR),
        }
    }

    /// Directory ZIP archives are expanded into.
    pub fn with_extraction_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extraction_dir = dir.into();
        self
    }

    /// Return the ingestor for a dotted, case-sensitive extension such as `".csv"`.
    ///
    /// # Errors
    ///
    /// [`IngestionError::UnsupportedFormat`] for anything outside [`SUPPORTED_EXTENSIONS`].
    pub fn get_ingestor(&self, extension: &str) -> IngestionResult<Box<dyn Ingestor>> {
        let opts = self.options.clone();
        let ingestor: Box<dyn Ingestor> = match extension {
            ".zip" => Box::new(ZipIngestor::new(self.extraction_dir.clone(), opts)),
            ".csv" => Box::new(CsvIngestor::new(opts)),
            ".xlsx" => Box::new(ExcelIngestor::new(opts)),
            ".parquet" => Box::new(ParquetIngestor::new(opts)),
            ".json" => Box::new(JsonIngestor::new(opts)),
            ".txt" => Box::new(TxtIngestor::new(opts)),
            other => {
                return Err(IngestionError::UnsupportedFormat {
                    extension: other.to_string(),
                });
            }
        };
        Ok(ingestor)
    }
}
