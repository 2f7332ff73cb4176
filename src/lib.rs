//! rinexmod library
//!
//! A Rust library for batch remediation of RINEX observation file headers.
//!
//! This library provides tools for:
//! - Rewriting station identity, instrument and position header records
//! - Resolving the instrumentation period covering a file's observation
//!   window from an IGS site log
//! - Renaming files to the RINEX long-name convention
//! - Re-emitting files in gzip or uncompressed form
//! - Classified per-file failure handling that never aborts a batch

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod naming;
        pub mod periods;
        pub mod reconciler;
        pub mod site_index;
    }
    pub mod adapters {
        pub mod compression;
        pub mod rinex_file;
        pub mod sitelog;
    }
}

pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod run;
}

// Re-export commonly used types
pub use app::models::{CompressionKind, InstrumentationPeriod, ModificationSet};
pub use config::{HeaderOverrides, RunConfig};

/// Result type alias for rinexmod operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for run-fatal conditions; per-file conditions are classified
/// separately in [`processor::failure::FailureKind`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid run configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Site log could not be parsed into instrumentation periods
    #[error("Site log error in '{file}': {message}")]
    Sitelog { file: String, message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Input file or list not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a site log error
    pub fn sitelog(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sitelog {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}
