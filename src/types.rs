//! Core data model types for ingestion.
//!
//! Every supported format decodes into a [`Table`]: an ordered list of column names plus
//! row-major [`Value`] cells. The table is transient; only its shape (columns and row count)
//! ends up in the persisted [`crate::metadata::FileMetadata`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

/// In-memory tabular structure produced by parsing a source file.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as [`Table::columns`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// The tabular file types a [`crate::metadata::FileMetadata`] can describe.
///
/// Serialized as the dotted extension (`".csv"`, `".xlsx"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Comma-separated values.
    #[serde(rename = ".csv")]
    Csv,
    /// Excel workbook (first sheet).
    #[serde(rename = ".xlsx")]
    Xlsx,
    /// Apache Parquet.
    #[serde(rename = ".parquet")]
    Parquet,
    /// Record-oriented JSON.
    #[serde(rename = ".json")]
    Json,
    /// Tab-delimited text.
    #[serde(rename = ".txt")]
    Txt,
}

impl FileType {
    /// All tabular file types, in the order they are documented.
    pub const ALL: [FileType; 5] = [
        FileType::Csv,
        FileType::Xlsx,
        FileType::Parquet,
        FileType::Json,
        FileType::Txt,
    ];

    /// Parse a file type from a dotted extension such as `".csv"`.
    ///
    /// Matching is case-sensitive: `".CSV"` is not recognized.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".csv" => Some(Self::Csv),
            ".xlsx" => Some(Self::Xlsx),
            ".parquet" => Some(Self::Parquet),
            ".json" => Some(Self::Json),
            ".txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// The dotted extension for this file type.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Xlsx => ".xlsx",
            Self::Parquet => ".parquet",
            Self::Json => ".json",
            Self::Txt => ".txt",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
