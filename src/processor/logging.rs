//! Per-run logging context
//!
//! Each run writes warnings and errors to a timestamped log file in the
//! output directory while keeping console output at INFO (DEBUG with
//! --verbose). The subscriber is scoped to the run so the file handle
//! is released when the run ends.

use crate::constants::{LOG_FILE_SUFFIX, LOG_FILE_TIMESTAMP_FORMAT};
use crate::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// A run-scoped logging context; dropping it restores the previous
/// subscriber and closes the log file.
pub struct RunLogger {
    /// Path of the log file receiving warnings and errors
    pub path: PathBuf,

    _guard: DefaultGuard,
}

impl RunLogger {
    /// Install a run-scoped subscriber logging to the console and to a
    /// timestamped file under `output_dir`.
    pub fn init(output_dir: &Path, verbose: bool) -> Result<Self> {
        let timestamp = chrono::Local::now().format(LOG_FILE_TIMESTAMP_FORMAT);
        let path = output_dir.join(format!("{}{}", timestamp, LOG_FILE_SUFFIX));

        let file = File::create(&path).map_err(|e| {
            Error::io(format!("Could not create log file {}", path.display()), e)
        })?;

        let console_level = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_level);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_filter(LevelFilter::WARN);

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);
        let guard = tracing::subscriber::set_default(subscriber);

        Ok(Self {
            path,
            _guard: guard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_timestamped_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let logger = RunLogger::init(temp_dir.path(), false).unwrap();
        assert!(logger.path.exists());
        let name = logger.path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with(LOG_FILE_SUFFIX));
        assert_eq!(name.len(), 14 + LOG_FILE_SUFFIX.len());
    }

    #[test]
    fn test_warnings_reach_the_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let logger = RunLogger::init(temp_dir.path(), false).unwrap();
        tracing::warn!("32 - something to grep for");
        tracing::info!("info stays on the console");
        let path = logger.path.clone();
        drop(logger);

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("32 - something to grep for"));
        assert!(!content.contains("info stays on the console"));
    }
}
