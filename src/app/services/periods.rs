//! Instrumentation period resolution
//!
//! Selects the single instrumentation period applicable to a file's
//! observation window, optionally merging adjacent periods that differ
//! only in receiver firmware.

use crate::app::models::InstrumentationPeriod;
use chrono::NaiveDateTime;

/// Outcome of resolving a file's observation window against a station's
/// instrumentation periods.
#[derive(Debug, PartialEq)]
pub enum PeriodMatch<'a> {
    /// No period overlaps the window
    NoCoverage,

    /// Several periods overlap the window and the caller did not ask to
    /// ignore firmware changes; treated as no coverage, logged distinctly
    Ambiguous { count: usize },

    /// Exactly one period overlaps the window
    Single(&'a InstrumentationPeriod),

    /// Several periods were merged under `ignore_firmware`; the temporally
    /// first period is the base whose values win. `count` is the number of
    /// merged candidates; `inconsistent` is set when they also differ in
    /// non-firmware fields.
    Merged {
        base: &'a InstrumentationPeriod,
        count: usize,
        inconsistent: bool,
    },
}

impl PeriodMatch<'_> {
    /// Whether the resolution merged several periods
    pub fn was_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Resolve the instrumentation period applicable to the half-open
/// observation window `[start, end)`.
///
/// Candidates are ordered temporally (start time, stable on ties) before
/// selection, so the merge base is deterministic even for overlapping or
/// unordered period tables.
pub fn resolve<'a>(
    periods: &'a [InstrumentationPeriod],
    start: NaiveDateTime,
    end: NaiveDateTime,
    ignore_firmware: bool,
) -> PeriodMatch<'a> {
    let mut candidates: Vec<&InstrumentationPeriod> =
        periods.iter().filter(|p| p.overlaps(start, end)).collect();
    candidates.sort_by_key(|p| p.start);

    match candidates.as_slice() {
        [] => PeriodMatch::NoCoverage,
        [single] => PeriodMatch::Single(single),
        [base, rest @ ..] => {
            if !ignore_firmware {
                return PeriodMatch::Ambiguous {
                    count: candidates.len(),
                };
            }

            let inconsistent = rest
                .iter()
                .any(|p| !base.same_instrument_except_firmware(p));

            PeriodMatch::Merged {
                base,
                count: candidates.len(),
                inconsistent,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Antenna, Receiver};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn period(
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        firmware: &str,
    ) -> InstrumentationPeriod {
        InstrumentationPeriod {
            station: "abmf".to_string(),
            start,
            end,
            receiver: Receiver {
                model: "TRIMBLE NETR9".to_string(),
                serial: "5033K".to_string(),
                firmware: firmware.to_string(),
            },
            antenna: Antenna {
                model: "TRM57971.00 NONE".to_string(),
                serial: "144".to_string(),
            },
            position: [2919785.7, -5383745.1, 1774604.7],
            eccentricity: [0.0083, 0.0, 0.0],
            operator_agency: "IPGP".to_string(),
            responsible_agency: "RGP".to_string(),
            observables: "GPS+GLO".to_string(),
        }
    }

    #[test]
    fn test_window_inside_single_period() {
        let periods = vec![
            period(date(2020, 1, 1), Some(date(2021, 1, 1)), "5.22"),
            period(date(2021, 1, 1), None, "5.45"),
        ];

        let resolved = resolve(&periods, date(2021, 3, 15), date(2021, 3, 16), false);
        match resolved {
            PeriodMatch::Single(p) => assert_eq!(p.receiver.firmware, "5.45"),
            other => panic!("expected Single, got {:?}", other),
        }
        assert!(!resolved.was_merged());
    }

    #[test]
    fn test_no_overlap_is_no_coverage_regardless_of_ignore() {
        let periods = vec![period(date(2020, 1, 1), Some(date(2021, 1, 1)), "5.22")];

        let window = (date(2022, 1, 1), date(2022, 1, 2));
        assert_eq!(
            resolve(&periods, window.0, window.1, false),
            PeriodMatch::NoCoverage
        );
        assert_eq!(
            resolve(&periods, window.0, window.1, true),
            PeriodMatch::NoCoverage
        );
    }

    #[test]
    fn test_boundary_straddle_without_ignore_is_ambiguous() {
        let periods = vec![
            period(date(2020, 1, 1), Some(date(2021, 1, 1)), "5.22"),
            period(date(2021, 1, 1), None, "5.45"),
        ];

        let resolved = resolve(&periods, date(2020, 12, 31), date(2021, 1, 2), false);
        assert_eq!(resolved, PeriodMatch::Ambiguous { count: 2 });
    }

    #[test]
    fn test_firmware_only_merge_takes_first_period() {
        let periods = vec![
            period(date(2020, 1, 1), Some(date(2021, 1, 1)), "5.22"),
            period(date(2021, 1, 1), None, "5.45"),
        ];

        let resolved = resolve(&periods, date(2020, 12, 31), date(2021, 1, 2), true);
        match resolved {
            PeriodMatch::Merged {
                base,
                count,
                inconsistent,
            } => {
                assert_eq!(base.receiver.firmware, "5.22");
                assert_eq!(count, 2);
                assert!(!inconsistent);
            }
            other => panic!("expected Merged, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_surfaces_non_firmware_inconsistency() {
        let mut second = period(date(2021, 1, 1), None, "5.45");
        second.antenna.serial = "145".to_string();
        let periods = vec![
            period(date(2020, 1, 1), Some(date(2021, 1, 1)), "5.22"),
            second,
        ];

        match resolve(&periods, date(2020, 12, 31), date(2021, 1, 2), true) {
            PeriodMatch::Merged {
                base, inconsistent, ..
            } => {
                // Base period values win deterministically
                assert_eq!(base.antenna.serial, "144");
                assert!(inconsistent);
            }
            other => panic!("expected Merged, got {:?}", other),
        }
    }

    #[test]
    fn test_unordered_table_resolves_deterministically() {
        let periods = vec![
            period(date(2021, 1, 1), None, "5.45"),
            period(date(2020, 1, 1), Some(date(2021, 1, 1)), "5.22"),
        ];

        match resolve(&periods, date(2020, 12, 31), date(2021, 1, 2), true) {
            PeriodMatch::Merged { base, .. } => assert_eq!(base.receiver.firmware, "5.22"),
            other => panic!("expected Merged, got {:?}", other),
        }
    }
}
