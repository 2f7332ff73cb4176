//! Data models for rinexmod
//!
//! This module contains the core data structures for representing station
//! instrumentation history and the reconciled header-field assignments
//! applied to an observation file.

use chrono::NaiveDateTime;
use std::path::Path;

// =============================================================================
// Instrumentation
// =============================================================================

/// GNSS receiver in use during one instrumentation period
#[derive(Debug, Clone, PartialEq)]
pub struct Receiver {
    /// Receiver model designation (e.g., "TRIMBLE NETR9")
    pub model: String,

    /// Receiver serial number
    pub serial: String,

    /// Firmware version installed during the period
    pub firmware: String,
}

/// GNSS antenna in use during one instrumentation period
#[derive(Debug, Clone, PartialEq)]
pub struct Antenna {
    /// Antenna model designation, including radome code
    pub model: String,

    /// Antenna serial number
    pub serial: String,
}

/// A time-bounded record of which receiver/antenna/position was in use
/// at a station, assembled from the site log.
///
/// Periods for one station are temporally ordered and may abut. They are
/// not assumed non-overlapping; the period resolver handles ties.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentationPeriod {
    /// 4-character station code the period belongs to
    pub station: String,

    /// Start of the period (UTC)
    pub start: NaiveDateTime,

    /// End of the period (UTC); `None` means the period is still open
    pub end: Option<NaiveDateTime>,

    /// Receiver installed during the period
    pub receiver: Receiver,

    /// Antenna installed during the period
    pub antenna: Antenna,

    /// Approximate antenna position, ECEF X/Y/Z in meters
    pub position: [f64; 3],

    /// Marker-to-ARP eccentricity, Up/East/North in meters
    pub eccentricity: [f64; 3],

    /// On-site agency preferred abbreviation
    pub operator_agency: String,

    /// Responsible agency preferred abbreviation
    pub responsible_agency: String,

    /// Satellite system token observed during the period (e.g., "GPS",
    /// "GPS+GLO"); translated to a one-letter code when applied to a header
    pub observables: String,
}

impl InstrumentationPeriod {
    /// Whether this period overlaps the half-open window `[start, end)`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && self.end.is_none_or(|period_end| period_end > start)
    }

    /// Whether two periods describe the same instrumentation apart from
    /// the receiver firmware version.
    pub fn same_instrument_except_firmware(&self, other: &Self) -> bool {
        self.station == other.station
            && self.receiver.model == other.receiver.model
            && self.receiver.serial == other.receiver.serial
            && self.antenna == other.antenna
            && self.position == other.position
            && self.eccentricity == other.eccentricity
            && self.operator_agency == other.operator_agency
            && self.responsible_agency == other.responsible_agency
            && self.observables == other.observables
    }
}

// =============================================================================
// Modification Set
// =============================================================================

/// The reconciled header-field assignments actually applied to one file.
///
/// Every field is optional; an absent field leaves the corresponding
/// header record unchanged. Built either from a resolved
/// [`InstrumentationPeriod`] or from keyword overrides, so downstream
/// application logic is source-agnostic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationSet {
    /// 4-character station code written to MARKER NAME
    pub station: Option<String>,

    /// Receiver serial number
    pub receiver_serial: Option<String>,

    /// Receiver model designation
    pub receiver_type: Option<String>,

    /// Receiver firmware version
    pub receiver_fw: Option<String>,

    /// Antenna serial number
    pub antenna_serial: Option<String>,

    /// Antenna model designation
    pub antenna_type: Option<String>,

    /// Approximate position, ECEF X in meters
    pub antenna_x_pos: Option<f64>,

    /// Approximate position, ECEF Y in meters
    pub antenna_y_pos: Option<f64>,

    /// Approximate position, ECEF Z in meters
    pub antenna_z_pos: Option<f64>,

    /// Antenna eccentricity, first component (Up) in meters
    pub antenna_x_delta: Option<f64>,

    /// Antenna eccentricity, second component (East) in meters
    pub antenna_y_delta: Option<f64>,

    /// Antenna eccentricity, third component (North) in meters
    pub antenna_z_delta: Option<f64>,

    /// Observer written to OBSERVER / AGENCY
    pub operator: Option<String>,

    /// Agency written to OBSERVER / AGENCY
    pub agency: Option<String>,

    /// Satellite system token for the RINEX VERSION / TYPE record
    pub observables: Option<String>,
}

impl ModificationSet {
    /// Whether the set carries no assignment at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Compression
// =============================================================================

/// Compression wrapping of an observation file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionKind {
    /// Plain, uncompressed file
    Plain,
    /// Gzip (.gz), the IGS-recommended wrapping
    Gzip,
    /// Legacy Unix compress (.Z); recognized on input only
    LegacyZ,
}

impl CompressionKind {
    /// Detect the compression kind from a file path's extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Self::Gzip,
            Some("Z") => Self::LegacyZ,
            _ => Self::Plain,
        }
    }

    /// Extension appended to an output filename, if any
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Gzip => Some("gz"),
            Self::LegacyZ => Some("Z"),
        }
    }
}
