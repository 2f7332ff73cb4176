//! Long-name filename derivation
//!
//! Derives the standardized RINEX long filename from a file's 9-character
//! site identifier, observation start time, file period class, sample rate
//! and observable-type code.

use crate::constants::{
    DAILY_PERIOD, DAILY_TIME_FORMAT, OBSERVATION_SUFFIX, SUB_DAILY_TIME_FORMAT,
};
use chrono::NaiveDateTime;

/// Compute the long-form filename for an observation file.
///
/// A daily file encodes only the year and day-of-year with zeroed clock
/// fields; any other period class keeps the hour and minute. The result is
/// the underscore-joined concatenation of the site identifier, the time
/// token, the period token, the sample-rate token and the observable-type
/// code with the observation-product suffix.
pub fn long_name(
    site_id: &str,
    start: NaiveDateTime,
    file_period: &str,
    sample_rate: &str,
    observable_type: &str,
) -> String {
    let time_format = if file_period == DAILY_PERIOD {
        DAILY_TIME_FORMAT
    } else {
        SUB_DAILY_TIME_FORMAT
    };

    format!(
        "{}_{}_{}_{}_{}{}",
        site_id,
        start.format(time_format),
        file_period,
        sample_rate,
        observable_type,
        OBSERVATION_SUFFIX
    )
}
