use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use data_ingestor::config::PathConfig;
use data_ingestor::ingestion::{
    CompositeObserver, FileObserver, IngestionObserver, IngestionOptions, IngestionSeverity, TracingObserver,
};
use data_ingestor::pipeline;

/// Describe every tabular file in a folder and write metadata.json.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Project root holding `data/`, `extracted_data/` and `metadata/`.
    ///
    /// Defaults to the directory containing this executable.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Folder scanned for input files (overrides `<root>/data`).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Folder ZIP archives are expanded into (overrides `<root>/extracted_data`).
    #[arg(long)]
    extract_dir: Option<PathBuf>,

    /// Folder metadata.json is written to (overrides `<root>/metadata`).
    #[arg(long)]
    metadata_dir: Option<PathBuf>,

    /// Also append ingestion events to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Stop at the first file that fails instead of skipping it.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    /// Minimum failure severity that raises an alert.
    #[arg(long, value_enum, default_value_t = AlertLevel::Critical)]
    alert_at: AlertLevel,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum AlertLevel {
    Info,
    Warning,
    Error,
    #[default]
    Critical,
}

impl From<AlertLevel> for IngestionSeverity {
    fn from(level: AlertLevel) -> Self {
        match level {
            AlertLevel::Info => Self::Info,
            AlertLevel::Warning => Self::Warning,
            AlertLevel::Error => Self::Error,
            AlertLevel::Critical => Self::Critical,
        }
    }
}

impl Cli {
    fn paths(&self) -> PathConfig {
        let mut paths = match &self.root {
            Some(root) => PathConfig::from_root(root),
            None => PathConfig::locate(),
        };
        if let Some(dir) = &self.data_dir {
            paths = paths.with_source_dir(dir);
        }
        if let Some(dir) = &self.extract_dir {
            paths = paths.with_extraction_dir(dir);
        }
        if let Some(dir) = &self.metadata_dir {
            paths = paths.with_metadata_dir(dir);
        }
        paths
    }

    fn options(&self) -> IngestionOptions {
        let observer: Arc<dyn IngestionObserver> = match &self.log_file {
            Some(log) => Arc::new(CompositeObserver::new(vec![
                Arc::new(TracingObserver),
                Arc::new(FileObserver::new(log)),
            ])),
            None => Arc::new(TracingObserver),
        };
        IngestionOptions {
            observer: Some(observer),
            alert_at_or_above: self.alert_at.into(),
            fail_fast: self.fail_fast,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = cli.paths();
    let report = pipeline::run(&paths, &cli.options())
        .with_context(|| format!("ingestion of {} failed", paths.source_dir.display()))?;

    println!("Ingestion process finished.");
    println!(
        "{} file(s) described, {} warning(s), {} failure(s)",
        report.batch.len(),
        report.warnings.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  failed: {}", failure.message);
    }
    if let Some(written) = &report.metadata_path {
        println!("metadata written to {}", written.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{AlertLevel, Cli};
    use data_ingestor::ingestion::IngestionSeverity;

    #[test]
    fn directory_overrides_apply_on_top_of_root() {
        let cli = Cli::parse_from(["data-ingestor", "--root", "/project", "--metadata-dir", "/tmp/meta"]);
        let paths = cli.paths();
        assert_eq!(paths.source_dir, std::path::Path::new("/project/data"));
        assert_eq!(paths.metadata_dir, std::path::Path::new("/tmp/meta"));
    }

    #[test]
    fn alert_level_maps_to_severity() {
        let cli = Cli::parse_from(["data-ingestor", "--alert-at", "warning", "--fail-fast"]);
        assert!(matches!(cli.alert_at, AlertLevel::Warning));
        let opts = cli.options();
        assert_eq!(opts.alert_at_or_above, IngestionSeverity::Warning);
        assert!(opts.fail_fast);
        assert!(opts.observer.is_some());
    }
}
