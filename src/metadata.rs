//! Per-file metadata records, reload recipes, and the `metadata.json` artifact.
//!
//! A [`FileMetadata`] serializes as:
//!
//! ```json
//! {
//!     "file_name": "sales.csv",
//!     "file_type": ".csv",
//!     "columns": ["id", "amount"],
//!     "row_count": 3,
//!     "import_instructions": {
//!         "function": "csv_reader",
//!         "arguments": { "path": "data/sales.csv" }
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::reader::ReaderId;
use crate::types::{FileType, Table};

/// File name of the persisted metadata artifact.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Argument key holding the path to read.
pub const ARG_PATH: &str = "path";
/// Argument key holding a single-character delimiter.
pub const ARG_DELIMITER: &str = "delimiter";

/// Minimal instructions to re-derive a [`Table`] from the same path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadRecipe {
    /// Which reader to invoke.
    #[serde(rename = "function")]
    pub reader_id: ReaderId,
    /// Reader arguments (`path`, and `delimiter` for delimited readers where recorded).
    pub arguments: BTreeMap<String, String>,
}

impl ReloadRecipe {
    /// Build the recipe for reading `path` with `reader`.
    ///
    /// The TXT reader records its tab delimiter explicitly; the CSV reader relies on the
    /// comma default.
    pub fn for_path(reader: ReaderId, path: &Path) -> Self {
        let mut arguments = BTreeMap::new();
        arguments.insert(ARG_PATH.to_string(), path.to_string_lossy().into_owned());
        if reader == ReaderId::TxtReader {
            arguments.insert(ARG_DELIMITER.to_string(), "\t".to_string());
        }
        Self {
            reader_id: reader,
            arguments,
        }
    }

    /// The `path` argument.
    pub fn path(&self) -> IngestionResult<&Path> {
        self.arguments
            .get(ARG_PATH)
            .map(Path::new)
            .ok_or_else(|| IngestionError::InvalidRecipe {
                message: format!("{:?} recipe has no '{ARG_PATH}' argument", self.reader_id),
            })
    }

    /// The `delimiter` argument, if present.
    pub fn delimiter(&self) -> IngestionResult<Option<u8>> {
        match self.arguments.get(ARG_DELIMITER) {
            None => Ok(None),
            Some(d) if d.len() == 1 => Ok(Some(d.as_bytes()[0])),
            Some(d) => Err(IngestionError::InvalidRecipe {
                message: format!("delimiter must be a single byte, got {d:?}"),
            }),
        }
    }

    /// Run the recipe against the file currently on disk.
    pub fn execute(&self) -> IngestionResult<Table> {
        self.reader_id.read(self.path()?, self.delimiter()?)
    }
}

/// Descriptor of one successfully ingested tabular file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Base name of the file.
    pub file_name: String,
    /// Tabular file type; always consistent with the processed extension.
    pub file_type: FileType,
    /// Column names in source order.
    pub columns: Vec<String>,
    /// Number of rows parsed at ingestion time.
    pub row_count: usize,
    /// How to reload the file.
    #[serde(rename = "import_instructions")]
    pub reload_recipe: ReloadRecipe,
}

impl FileMetadata {
    /// Build metadata from a decoded table and the recipe that produced it.
    pub fn from_table(file_name: impl Into<String>, file_type: FileType, table: &Table, reload_recipe: ReloadRecipe) -> Self {
        Self {
            file_name: file_name.into(),
            file_type,
            columns: table.columns.clone(),
            row_count: table.row_count(),
            reload_recipe,
        }
    }
}

/// Ordered metadata for every file processed by one run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataBatch {
    entries: Vec<FileMetadata>,
}

impl MetadataBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.
    pub fn push(&mut self, entry: FileMetadata) {
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileMetadata> {
        self.entries.iter()
    }
}

impl From<Vec<FileMetadata>> for MetadataBatch {
    fn from(entries: Vec<FileMetadata>) -> Self {
        Self { entries }
    }
}

impl Extend<FileMetadata> for MetadataBatch {
    fn extend<I: IntoIterator<Item = FileMetadata>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a> IntoIterator for &'a MetadataBatch {
    type Item = &'a FileMetadata;
    type IntoIter = std::slice::Iter<'a, FileMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serialize `batch` to `<metadata_dir>/metadata.json`, replacing any previous artifact.
///
/// The directory is created if absent. The JSON is written (4-space indented) to a sibling
/// temporary file which is then renamed over the destination, so readers never observe a
/// partially written artifact.
///
/// Returns the path of the written artifact.
pub fn save_metadata(batch: &MetadataBatch, metadata_dir: impl AsRef<Path>) -> IngestionResult<PathBuf> {
    let metadata_dir = metadata_dir.as_ref();
    fs::create_dir_all(metadata_dir)?;

    let final_path = metadata_dir.join(METADATA_FILE_NAME);
    let tmp_path = metadata_dir.join(format!(".{METADATA_FILE_NAME}.tmp"));

    let written = write_pretty(batch, &tmp_path).and_then(|()| Ok(fs::rename(&tmp_path, &final_path)?));
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written.map(|()| final_path)
}

fn write_pretty(batch: &MetadataBatch, path: &Path) -> IngestionResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    batch.serialize(&mut ser)?;
    out.write_all(b"\n")?;
    out.flush()?;
    out.get_ref().sync_all()?;
    Ok(())
}

/// Read a metadata artifact previously written by [`save_metadata`].
pub fn load_metadata(path: impl AsRef<Path>) -> IngestionResult<MetadataBatch> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
