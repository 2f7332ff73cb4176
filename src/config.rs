//! Run configuration and validation.
//!
//! Provides the immutable per-run configuration, the typed keyword
//! override structure, and the upfront validation rules that must all
//! pass before any file is touched.

use crate::app::models::CompressionKind;
use crate::constants::{ACCEPTED_KEYWORDS, SITE_CODE_LEN};
use crate::{Error, Result};
use std::path::PathBuf;

/// Explicit header-field overrides supplied as `key=value` pairs.
///
/// One named, typed optional slot per accepted keyword; unknown keys and
/// malformed numeric values are rejected at construction time, so no
/// unknown-key check exists downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderOverrides {
    pub station: Option<String>,
    pub receiver_serial: Option<String>,
    pub receiver_type: Option<String>,
    pub receiver_fw: Option<String>,
    pub antenna_serial: Option<String>,
    pub antenna_type: Option<String>,
    pub antenna_x_pos: Option<f64>,
    pub antenna_y_pos: Option<f64>,
    pub antenna_z_pos: Option<f64>,
    pub antenna_x_delta: Option<f64>,
    pub antenna_y_delta: Option<f64>,
    pub antenna_z_delta: Option<f64>,
    pub operator: Option<String>,
    pub agency: Option<String>,
    pub observables: Option<String>,
}

impl HeaderOverrides {
    /// Build from raw `key=value` pairs as supplied on the command line.
    ///
    /// Keys must belong to the fixed accepted set; position and delta
    /// values must parse as decimal numbers.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self> {
        let mut overrides = Self::default();

        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::configuration(format!(
                    "Invalid modification keyword '{}': expected key=value",
                    pair
                ))
            })?;

            let mut numeric = |field: &mut Option<f64>| -> Result<()> {
                let parsed: f64 = value.trim().parse().map_err(|_| {
                    Error::configuration(format!(
                        "Invalid numeric value '{}' for keyword '{}'",
                        value, key
                    ))
                })?;
                *field = Some(parsed);
                Ok(())
            };

            match key {
                "station" => overrides.station = Some(value.to_string()),
                "receiver_serial" => overrides.receiver_serial = Some(value.to_string()),
                "receiver_type" => overrides.receiver_type = Some(value.to_string()),
                "receiver_fw" => overrides.receiver_fw = Some(value.to_string()),
                "antenna_serial" => overrides.antenna_serial = Some(value.to_string()),
                "antenna_type" => overrides.antenna_type = Some(value.to_string()),
                "antenna_X_pos" => numeric(&mut overrides.antenna_x_pos)?,
                "antenna_Y_pos" => numeric(&mut overrides.antenna_y_pos)?,
                "antenna_Z_pos" => numeric(&mut overrides.antenna_z_pos)?,
                "antenna_X_delta" => numeric(&mut overrides.antenna_x_delta)?,
                "antenna_Y_delta" => numeric(&mut overrides.antenna_y_delta)?,
                "antenna_Z_delta" => numeric(&mut overrides.antenna_z_delta)?,
                "operator" => overrides.operator = Some(value.to_string()),
                "agency" => overrides.agency = Some(value.to_string()),
                "observables" => overrides.observables = Some(value.to_string()),
                _ => {
                    return Err(Error::configuration(format!(
                        "'{}' is not an acceptable keyword for header modification. \
                         Accepted keywords: {}",
                        key,
                        ACCEPTED_KEYWORDS.join(", ")
                    )));
                }
            }
        }

        Ok(overrides)
    }

    /// Whether no override was supplied at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Immutable configuration of one rinexmod run.
///
/// Constructed once from the CLI surface and validated by
/// [`RunConfig::validate`] before any file is touched.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory where modified files and the run log are written
    pub output_dir: PathBuf,

    /// 4-character station code substituted into filenames and headers
    pub marker: Option<String>,

    /// Rename files to the RINEX long-name convention
    pub rename_long: bool,

    /// IGS site log driving the header modifications
    pub sitelog: Option<PathBuf>,

    /// Explicit keyword overrides driving the header modifications
    pub overrides: Option<HeaderOverrides>,

    /// Keep processing a file whose header station code does not match
    /// the site log's station code
    pub force: bool,

    /// Merge instrumentation periods that differ only in firmware
    pub ignore_firmware: bool,

    /// Common path prefix replaced by the output directory when
    /// reconstructing the input subtree
    pub reconstruct: Option<PathBuf>,

    /// Explicit output compression; `None` keeps each file's original one
    pub compression: Option<CompressionKind>,

    /// Path to the 4-char to 9-char site identifier list
    pub nine_char_file: Option<PathBuf>,

    /// Log full header metadata before and after modification
    pub verbose: bool,
}

impl RunConfig {
    /// Validate the run configuration.
    ///
    /// Fatal conditions return an error with a distinct message; non-fatal
    /// inconsistencies are returned as warning strings for the caller to
    /// log once the run log is open.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        if self.sitelog.is_some() && self.overrides.is_some() {
            return Err(Error::configuration(
                "The --sitelog and --modification-kw sources are mutually exclusive; \
                 provide at most one of them",
            ));
        }

        if self.sitelog.is_none()
            && self.overrides.is_none()
            && self.marker.is_none()
            && !self.rename_long
        {
            return Err(Error::configuration(
                "No action requested; provide at least one of --sitelog, \
                 --modification-kw, --marker or --name",
            ));
        }

        if let Some(marker) = &self.marker {
            if marker.len() != SITE_CODE_LEN || !marker.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(Error::configuration(format!(
                    "Invalid marker '{}': expected exactly {} alphanumeric characters",
                    marker, SITE_CODE_LEN
                )));
            }
        }

        if self.force && self.sitelog.is_none() {
            warnings
                .push("--force is meaningful only when --sitelog is also provided".to_string());
        }

        if self.ignore_firmware && self.sitelog.is_none() {
            warnings
                .push("--ignore is meaningful only when --sitelog is also provided".to_string());
        }

        if self.compression == Some(CompressionKind::LegacyZ) {
            return Err(Error::configuration(
                "Output compression 'Z' (legacy Unix compress) is not supported by the \
                 built-in codec; use 'gz' instead",
            ));
        }

        Ok(warnings)
    }
}
