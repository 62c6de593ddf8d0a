//! `data-ingestor` turns a folder of tabular files into a catalog of per-file metadata.
//!
//! Every file in a source folder is read into an in-memory [`types::Table`] and described as a
//! [`metadata::FileMetadata`]: its name, type, column names, row count, and a
//! [`metadata::ReloadRecipe`] that re-reads the same table later. The whole batch is saved as
//! `metadata.json`.
//!
//! ## What you can ingest
//!
//! **File formats (selected by extension, case-sensitive):**
//!
//! - **CSV**: `.csv` (comma-delimited, header row)
//! - **TXT**: `.txt` (tab-delimited, header row)
//! - **JSON**: `.json` (array of objects, a single object, or newline-delimited objects)
//! - **Parquet**: `.parquet`
//! - **Excel** (Cargo feature `excel`, on by default): `.xlsx`, first sheet
//! - **ZIP**: `.zip` archives of any of the above, expanded into an extraction folder
//!
//! Cells are typed [`types::Value`]s; empty cells and JSON `null` map to
//! [`types::Value::Null`].
//!
//! ## Quick example: one file
//!
//! ```no_run
//! use data_ingestor::ingestion::{IngestorFactory, IngestionOptions};
//!
//! # fn main() -> Result<(), data_ingestor::IngestionError> {
//! let factory = IngestorFactory::new(IngestionOptions::default());
//! let ingestor = factory.get_ingestor(".csv")?;
//! for md in ingestor.ingest("data/sales.csv".as_ref())?.into_metadata() {
//!     println!("{} rows={} columns={:?}", md.file_name, md.row_count, md.columns);
//!     // Re-derive the same table from the recorded recipe.
//!     let table = md.reload_recipe.execute()?;
//!     assert_eq!(table.row_count(), md.row_count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: a whole folder
//!
//! ```no_run
//! use data_ingestor::config::PathConfig;
//! use data_ingestor::ingestion::IngestionOptions;
//! use data_ingestor::pipeline;
//!
//! # fn main() -> Result<(), data_ingestor::IngestionError> {
//! let report = pipeline::run(&PathConfig::from_root("."), &IngestionOptions::default())?;
//! println!("{} files described, {} failed", report.batch.len(), report.failures.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format readers, per-format ingestors, the factory, ZIP expansion, observers
//! - [`metadata`]: metadata records, reload recipes, `metadata.json` persistence
//! - [`pipeline`]: the directory-level batch run
//! - [`config`]: source / extraction / metadata folder layout
//! - [`types`]: in-memory table and file type
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod ingestion;
pub mod metadata;
pub mod pipeline;
pub mod types;

pub use error::{DecodeError, IngestionError, IngestionResult};
