//! Directory layout for a pipeline run.

use std::path::{Path, PathBuf};

/// Default source folder name under the project root.
pub const DATA_DIR_NAME: &str = "data";
/// Default extraction folder name under the project root.
pub const EXTRACTED_DIR_NAME: &str = "extracted_data";
/// Default metadata folder name under the project root.
pub const METADATA_DIR_NAME: &str = "metadata";

/// The three sibling folders a run works with.
///
/// Passed explicitly to [`crate::pipeline::run`]; there is no global path state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConfig {
    /// Folder scanned for input files.
    pub source_dir: PathBuf,
    /// Folder ZIP archives are expanded into.
    pub extraction_dir: PathBuf,
    /// Folder `metadata.json` is written to.
    pub metadata_dir: PathBuf,
}

impl PathConfig {
    /// `root/data`, `root/extracted_data`, `root/metadata`.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            source_dir: root.join(DATA_DIR_NAME),
            extraction_dir: root.join(EXTRACTED_DIR_NAME),
            metadata_dir: root.join(METADATA_DIR_NAME),
        }
    }

    /// Defaults relative to the directory containing the running executable, falling back to
    /// the current directory when that cannot be determined.
    pub fn locate() -> Self {
        let root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_root(root)
    }

    /// Override the source folder.
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Override the extraction folder.
    pub fn with_extraction_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extraction_dir = dir.into();
        self
    }

    /// Override the metadata folder.
    pub fn with_metadata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.metadata_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::PathConfig;

    #[test]
    fn from_root_uses_sibling_folders() {
        let cfg = PathConfig::from_root("/project");
        assert_eq!(cfg.source_dir, Path::new("/project/data"));
        assert_eq!(cfg.extraction_dir, Path::new("/project/extracted_data"));
        assert_eq!(cfg.metadata_dir, Path::new("/project/metadata"));
    }

    #[test]
    fn overrides_replace_single_folders() {
        let cfg = PathConfig::from_root("/project").with_metadata_dir("/tmp/meta");
        assert_eq!(cfg.source_dir, Path::new("/project/data"));
        assert_eq!(cfg.metadata_dir, Path::new("/tmp/meta"));
    }
}
