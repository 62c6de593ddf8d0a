//! Format reader: dispatches a declared extension to a decoder and produces the
//! [`ReloadRecipe`] that reproduces the same [`Table`].
//!
//! Dispatch is purely on the declared extension; file contents are never sniffed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, IngestionError, IngestionResult};
use crate::metadata::ReloadRecipe;
use crate::types::{FileType, Table};

use super::csv::{self, CSV_DELIMITER, TXT_DELIMITER};
use super::{json, parquet};

/// The closed set of readers a [`ReloadRecipe`] can reference.
///
/// Serialized recipes name one of these tags; nothing else can be invoked from metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderId {
    /// Comma-delimited text.
    CsvReader,
    /// First sheet of a workbook.
    ExcelReader,
    /// Parquet record reader.
    ParquetReader,
    /// Record-oriented JSON.
    JsonReader,
    /// Tab-delimited text.
    TxtReader,
}

impl ReaderId {
    /// The reader used for a given file type.
    pub fn for_file_type(file_type: FileType) -> Self {
        match file_type {
            FileType::Csv => Self::CsvReader,
            FileType::Xlsx => Self::ExcelReader,
            FileType::Parquet => Self::ParquetReader,
            FileType::Json => Self::JsonReader,
            FileType::Txt => Self::TxtReader,
        }
    }

    /// Default delimiter for delimited-text readers; `None` for every other reader.
    pub fn default_delimiter(self) -> Option<u8> {
        match self {
            Self::CsvReader => Some(CSV_DELIMITER),
            Self::TxtReader => Some(TXT_DELIMITER),
            _ => None,
        }
    }

    /// Decode `path` with this reader.
    ///
    /// `delimiter` overrides [`Self::default_delimiter`] and is ignored by non-delimited readers.
    pub fn read(self, path: &Path, delimiter: Option<u8>) -> IngestionResult<Table> {
        let decoded = match self {
            Self::CsvReader | Self::TxtReader => {
                let d = delimiter.or(self.default_delimiter()).unwrap_or(CSV_DELIMITER);
                csv::read_delimited_from_path(path, d)
            }
            Self::JsonReader => json::read_json_from_path(path),
            Self::ParquetReader => parquet::read_parquet_from_path(path),
            Self::ExcelReader => return read_excel(path),
        };
        decoded.map_err(|source| parse_error(path, source))
    }
}

/// Read `path` as the format named by `declared_extension` (e.g. `".csv"`).
///
/// Returns the decoded [`Table`] together with the [`ReloadRecipe`] that produced it.
///
/// # Errors
///
/// - [`IngestionError::UnsupportedFormat`] if the extension is not one of the five tabular ones
/// - [`IngestionError::ParseError`] if the content does not decode as that format
///
/// ```no_run
/// use data_ingestor::ingestion::read_file;
///
/// # fn main() -> Result<(), data_ingestor::IngestionError> {
/// let (table, recipe) = read_file("data/sales.csv", ".csv")?;
/// println!("rows={} reader={:?}", table.row_count(), recipe.reader_id);
/// # Ok(())
/// # }
/// ```
pub fn read_file(path: impl AsRef<Path>, declared_extension: &str) -> IngestionResult<(Table, ReloadRecipe)> {
    let path = path.as_ref();
    let file_type = FileType::from_extension(declared_extension).ok_or_else(|| {
        IngestionError::UnsupportedFormat {
            extension: declared_extension.to_string(),
        }
    })?;

    let recipe = ReloadRecipe::for_path(ReaderId::for_file_type(file_type), path);
    let table = recipe.execute()?;
    Ok((table, recipe))
}

fn parse_error(path: &Path, source: DecodeError) -> IngestionError {
    IngestionError::ParseError {
        path: path.to_path_buf(),
        source,
    }
}

fn read_excel(path: &Path) -> IngestionResult<Table> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_excel_from_path(path).map_err(|source| parse_error(path, source))
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = path;
        Err(IngestionError::FeatureDisabled { feature: "excel" })
    }
}
