//! Application constants for rinexmod
//!
//! This module contains the fixed tokens, formats and accepted keyword
//! set used throughout the rinexmod application.

// =============================================================================
// Site Identifiers
// =============================================================================

/// Length of a short (marker) site code
pub const SITE_CODE_LEN: usize = 4;

/// Length of a long site identifier (marker + monument/receiver + country)
pub const LONG_SITE_ID_LEN: usize = 9;

/// Suffix appended to an upper-cased 4-char code when the country cannot
/// be resolved from the nine-char index ("00" monument/receiver, "XXX" country)
pub const UNKNOWN_COUNTRY_SUFFIX: &str = "00XXX";

// =============================================================================
// Long-Name Convention
// =============================================================================

/// File period token denoting a daily file
pub const DAILY_PERIOD: &str = "01D";

/// Time token format for daily files (clock fields zeroed)
pub const DAILY_TIME_FORMAT: &str = "%Y%j0000";

/// Time token format for sub-daily files
pub const SUB_DAILY_TIME_FORMAT: &str = "%Y%j%H%M";

/// Data-product suffix for observation files
pub const OBSERVATION_SUFFIX: &str = "O.rnx";

/// Fallback sample-rate token when the header carries no interval
pub const DEFAULT_SAMPLE_RATE: &str = "30S";

// =============================================================================
// Header Modification Keywords
// =============================================================================

/// The fixed set of accepted `--modification-kw` keys
pub const ACCEPTED_KEYWORDS: &[&str] = &[
    "station",
    "receiver_serial",
    "receiver_type",
    "receiver_fw",
    "antenna_serial",
    "antenna_type",
    "antenna_X_pos",
    "antenna_Y_pos",
    "antenna_Z_pos",
    "antenna_X_delta",
    "antenna_Y_delta",
    "antenna_Z_delta",
    "operator",
    "agency",
    "observables",
];

/// Provenance token recorded when modifications come from keyword overrides
pub const COMMAND_LINE_SOURCE: &str = "command line";

// =============================================================================
// Run Log
// =============================================================================

/// Timestamp prefix of the per-run log file name
pub const LOG_FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Suffix of the per-run log file name
pub const LOG_FILE_SUFFIX: &str = "_rinexmod.log";

/// Timestamp format of the "rinexmoded on" audit comment
pub const AUDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// =============================================================================
// Site Log Parsing
// =============================================================================

/// Date formats accepted in IGS site log date fields, tried in order
pub const SITELOG_DATE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M", "%Y-%m-%d"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_keywords_fixed_set() {
        assert_eq!(ACCEPTED_KEYWORDS.len(), 15);
        assert!(ACCEPTED_KEYWORDS.contains(&"station"));
        assert!(ACCEPTED_KEYWORDS.contains(&"antenna_Z_delta"));
        assert!(!ACCEPTED_KEYWORDS.contains(&"firmware"));
    }

    #[test]
    fn test_long_name_tokens() {
        assert_eq!(DAILY_PERIOD.len(), 3);
        assert!(OBSERVATION_SUFFIX.ends_with(".rnx"));
    }
}
