//! ZIP archive ingestion.
//!
//! An archive is expanded into the extraction directory and every eligible member is
//! described with the same reader the tabular ingestors use. Member problems never abort the
//! archive: unsupported or unreadable members become [`IngestionWarning`]s.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use zip::result::{ZipError, ZipResult};
use zip::ZipArchive;

use crate::error::{IngestionError, IngestionResult};
use crate::metadata::FileMetadata;
use crate::types::FileType;

use super::ingestors::{check_path, describe_file, stats_for, Ingested, Ingestor};
use super::observability::{IngestionContext, IngestionWarning};
use super::options::IngestionOptions;
use super::{extension_of, is_eligible_name};

/// Extraction directory used when none is configured.
pub const DEFAULT_EXTRACTION_DIR: &str = "extracted_data";

/// Outcome of ingesting one archive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArchiveIngest {
    /// Metadata for each member that was read successfully, in archive order.
    pub members: Vec<FileMetadata>,
    /// Members that were skipped or failed.
    pub warnings: Vec<IngestionWarning>,
}

/// Ingests `.zip` archives of tabular files.
#[derive(Debug, Clone)]
pub struct ZipIngestor {
    extraction_dir: PathBuf,
    options: IngestionOptions,
}

impl Default for ZipIngestor {
    fn default() -> Self {
        Self::new(DEFAULT_EXTRACTION_DIR, IngestionOptions::default())
    }
}

impl ZipIngestor {
    const EXTENSIONS: &'static [&'static str] = &[".zip"];

    /// Create an ingestor that expands archives into `extraction_dir`.
    pub fn new(extraction_dir: impl Into<PathBuf>, options: IngestionOptions) -> Self {
        Self {
            extraction_dir: extraction_dir.into(),
            options,
        }
    }

    /// Where members are written.
    pub fn extraction_dir(&self) -> &Path {
        &self.extraction_dir
    }

    /// Expand `path` and describe each eligible member.
    ///
    /// Members are written to `<extraction_dir>/<member path>`, overwriting files left by
    /// earlier runs. Entries whose path has any component starting with `.` or `_` are
    /// ignored (e.g. `.DS_Store`, `__MACOSX/`).
    ///
    /// # Errors
    ///
    /// - [`IngestionError::InvalidExtension`] / [`IngestionError::FileNotFound`] on pre-check
    /// - [`IngestionError::Archive`] if the file is not a readable ZIP archive
    /// - [`IngestionError::EmptyArchive`] if no eligible members remain
    pub fn ingest_archive(&self, path: impl AsRef<Path>) -> IngestionResult<ArchiveIngest> {
        let path = path.as_ref();
        let ctx = IngestionContext::new(path, extension_of(path));
        let result = check_path(path, Self::EXTENSIONS).and_then(|()| self.expand_and_describe(path));

        if let Err(e) = &result {
            self.options.report_failure(&ctx, e);
        }
        result
    }

    fn expand_and_describe(&self, path: &Path) -> IngestionResult<ArchiveIngest> {
        let archive_err = |source: ZipError| IngestionError::Archive {
            path: path.to_path_buf(),
            source,
        };

        let mut archive = ZipArchive::new(File::open(path)?).map_err(archive_err)?;
        let members = eligible_members(&mut archive).map_err(archive_err)?;
        if members.is_empty() {
            return Err(IngestionError::EmptyArchive {
                path: path.to_path_buf(),
            });
        }

        fs::create_dir_all(&self.extraction_dir)?;

        let mut out = ArchiveIngest::default();
        for (index, relative) in members {
            let member_path = self.extraction_dir.join(&relative);

            if let Err(source) = extract_entry(&mut archive, index, &member_path) {
                let err = archive_err(source);
                self.member_failed(&mut out, member_path, &err);
                continue;
            }

            let extension = extension_of(&member_path);
            let Some(file_type) = FileType::from_extension(&extension) else {
                self.warn(
                    &mut out,
                    IngestionWarning::UnsupportedFormat {
                        path: member_path,
                        extension,
                    },
                );
                continue;
            };

            match describe_file(&member_path, file_type) {
                Ok(md) => {
                    let ctx = IngestionContext::new(&member_path, extension);
                    self.options.report_success(&ctx, stats_for(&md));
                    out.members.push(md);
                }
                Err(err) => self.member_failed(&mut out, member_path, &err),
            }
        }

        Ok(out)
    }

    fn member_failed(&self, out: &mut ArchiveIngest, member_path: PathBuf, err: &IngestionError) {
        let ctx = IngestionContext::new(&member_path, extension_of(&member_path));
        self.options.report_failure(&ctx, err);
        self.warn(
            out,
            IngestionWarning::MemberFailed {
                path: member_path,
                message: err.to_string(),
            },
        );
    }

    fn warn(&self, out: &mut ArchiveIngest, warning: IngestionWarning) {
        self.options.report_warning(&warning);
        out.warnings.push(warning);
    }
}

impl Ingestor for ZipIngestor {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        Self::EXTENSIONS
    }

    fn ingest(&self, path: &Path) -> IngestionResult<Ingested> {
        self.ingest_archive(path).map(Ingested::Archive)
    }
}

/// File entries worth extracting, as `(index, safe relative path)` in archive order.
///
/// Only headers are read here; an entry that cannot be decrypted or decompressed fails later,
/// in [`extract_entry`], as that member alone.
fn eligible_members(archive: &mut ZipArchive<File>) -> ZipResult<Vec<(usize, PathBuf)>> {
    let mut members = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if entry.is_dir() {
            continue;
        }
        // Entries escaping the destination (absolute paths, `..`) have no enclosed name.
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let relative = PathBuf::from(relative);
        if is_eligible_member(&relative) {
            members.push((index, relative));
        }
    }
    Ok(members)
}

fn is_eligible_member(relative: &Path) -> bool {
    relative.components().all(|c| match c {
        Component::Normal(name) => is_eligible_name(&name.to_string_lossy()),
        _ => true,
    })
}

fn extract_entry(archive: &mut ZipArchive<File>, index: usize, dest: &Path) -> ZipResult<()> {
    let mut entry = archive.by_index(index)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(dest)?;
    io::copy(&mut entry, &mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::is_eligible_member;

    #[test]
    fn hidden_and_reserved_components_are_ineligible() {
        assert!(is_eligible_member(Path::new("a.csv")));
        assert!(is_eligible_member(Path::new("nested/a.csv")));
        assert!(!is_eligible_member(Path::new(".DS_Store")));
        assert!(!is_eligible_member(Path::new("_meta.csv")));
        assert!(!is_eligible_member(Path::new("__MACOSX/._a.csv")));
        assert!(!is_eligible_member(Path::new(".hidden/a.csv")));
    }
}
