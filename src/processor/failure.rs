//! Per-file failure classification
//!
//! Every way a file can drop out of (or raise a warning during) the
//! remediation pipeline carries a stable two-digit code, so operators
//! can grep run logs for a class of problem across large batches.

use std::fmt;
use std::path::PathBuf;

/// Classified per-file failures and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// 01 - the input file does not exist or is unreadable
    MissingFile,
    /// 02 - the file is not a RINEX observation file
    NotObservation,
    /// 03 - the compression wrapping is invalid or unsupported
    InvalidArchive,
    /// 04 - the internal encoding is corrupt
    InvalidEncoding,
    /// 30 - the file's directory is also the output directory
    SameDirectory,
    /// 31 - the input path does not contain the reconstruction prefix
    Unreconstructable { prefix: PathBuf },
    /// 32 (warning) - no nine-character identity found for the site
    UnresolvedCountry { site: String },
    /// 33 - the file's station does not match the site log's
    StationMismatch { file: String, sitelog: String },
    /// 34 (warning) - station mismatch bypassed by --force
    MismatchForced { file: String, sitelog: String },
    /// 35 - no single instrumentation period covers the observations
    NoPeriod { detail: String },
    /// 36 (warning) - several periods covered the observations and
    /// were merged onto the earliest
    MergedPeriods { count: usize },
}

impl FailureKind {
    /// Stable two-digit code for log grepping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "01",
            Self::NotObservation => "02",
            Self::InvalidArchive => "03",
            Self::InvalidEncoding => "04",
            Self::SameDirectory => "30",
            Self::Unreconstructable { .. } => "31",
            Self::UnresolvedCountry { .. } => "32",
            Self::StationMismatch { .. } => "33",
            Self::MismatchForced { .. } => "34",
            Self::NoPeriod { .. } => "35",
            Self::MergedPeriods { .. } => "36",
        }
    }

    /// Warnings let the file continue through the pipeline; everything
    /// else skips it.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedCountry { .. } | Self::MismatchForced { .. } | Self::MergedPeriods { .. }
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile => write!(f, "The specified file does not exist"),
            Self::NotObservation => write!(f, "The file is not a RINEX observation file"),
            Self::InvalidArchive => write!(f, "Invalid or unsupported compressed RINEX file"),
            Self::InvalidEncoding => write!(f, "Invalid internal file encoding"),
            Self::SameDirectory => {
                write!(f, "Input and output folders are the same, skipping")
            }
            Self::Unreconstructable { prefix } => write!(
                f,
                "The subfolder {} cannot be reconstructed in the output folder",
                prefix.display()
            ),
            Self::UnresolvedCountry { site } => write!(
                f,
                "No nine-character identity for {}, country code set to XXX",
                site
            ),
            Self::StationMismatch { file, sitelog } => write!(
                f,
                "The station name in the file ({}) does not match the sitelog ({})",
                file, sitelog
            ),
            Self::MismatchForced { file, sitelog } => write!(
                f,
                "Station mismatch ({} vs {}) bypassed with --force",
                file, sitelog
            ),
            Self::NoPeriod { detail } => {
                write!(f, "No instrumentation period found: {}", detail)
            }
            Self::MergedPeriods { count } => write!(
                f,
                "{} instrumentation periods cover the observations, merged onto the earliest",
                count
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(FailureKind::MissingFile.code(), "01");
        assert_eq!(FailureKind::SameDirectory.code(), "30");
        assert_eq!(
            FailureKind::MergedPeriods { count: 2 }.code(),
            "36"
        );
    }

    #[test]
    fn test_warning_classification() {
        assert!(FailureKind::UnresolvedCountry {
            site: "abmf".to_string()
        }
        .is_warning());
        assert!(FailureKind::MismatchForced {
            file: "ABMF".to_string(),
            sitelog: "AGAL".to_string()
        }
        .is_warning());
        assert!(!FailureKind::StationMismatch {
            file: "ABMF".to_string(),
            sitelog: "AGAL".to_string()
        }
        .is_warning());
        assert!(!FailureKind::InvalidArchive.is_warning());
    }
}
