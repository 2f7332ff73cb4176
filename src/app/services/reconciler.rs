//! Modification reconciliation
//!
//! Pure mapping from either a resolved instrumentation period or an
//! explicit keyword override set into the canonical [`ModificationSet`],
//! so the downstream header application logic is source-agnostic.

use crate::app::models::{InstrumentationPeriod, ModificationSet};
use crate::config::HeaderOverrides;

/// Build a modification set from a resolved instrumentation period.
///
/// Every field of the period is carried over; the station code is
/// upper-cased for the MARKER NAME record.
pub fn from_period(period: &InstrumentationPeriod) -> ModificationSet {
    ModificationSet {
        station: Some(period.station.to_uppercase()),
        receiver_serial: Some(period.receiver.serial.clone()),
        receiver_type: Some(period.receiver.model.clone()),
        receiver_fw: Some(period.receiver.firmware.clone()),
        antenna_serial: Some(period.antenna.serial.clone()),
        antenna_type: Some(period.antenna.model.clone()),
        antenna_x_pos: Some(period.position[0]),
        antenna_y_pos: Some(period.position[1]),
        antenna_z_pos: Some(period.position[2]),
        antenna_x_delta: Some(period.eccentricity[0]),
        antenna_y_delta: Some(period.eccentricity[1]),
        antenna_z_delta: Some(period.eccentricity[2]),
        operator: Some(period.operator_agency.clone()),
        agency: Some(period.responsible_agency.clone()),
        observables: Some(period.observables.clone()),
    }
}

/// Build a modification set from explicit keyword overrides.
///
/// Each supplied keyword maps 1:1 to its field; absent keywords leave the
/// corresponding header record untouched.
pub fn from_overrides(overrides: &HeaderOverrides) -> ModificationSet {
    ModificationSet {
        station: overrides.station.clone(),
        receiver_serial: overrides.receiver_serial.clone(),
        receiver_type: overrides.receiver_type.clone(),
        receiver_fw: overrides.receiver_fw.clone(),
        antenna_serial: overrides.antenna_serial.clone(),
        antenna_type: overrides.antenna_type.clone(),
        antenna_x_pos: overrides.antenna_x_pos,
        antenna_y_pos: overrides.antenna_y_pos,
        antenna_z_pos: overrides.antenna_z_pos,
        antenna_x_delta: overrides.antenna_x_delta,
        antenna_y_delta: overrides.antenna_y_delta,
        antenna_z_delta: overrides.antenna_z_delta,
        operator: overrides.operator.clone(),
        agency: overrides.agency.clone(),
        observables: overrides.observables.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Antenna, Receiver};
    use chrono::NaiveDate;

    #[test]
    fn test_from_period_populates_every_field() {
        let period = InstrumentationPeriod {
            station: "abmf".to_string(),
            start: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            end: None,
            receiver: Receiver {
                model: "TRIMBLE NETR9".to_string(),
                serial: "5033K".to_string(),
                firmware: "5.45".to_string(),
            },
            antenna: Antenna {
                model: "TRM57971.00 NONE".to_string(),
                serial: "144".to_string(),
            },
            position: [2919785.712, -5383745.067, 1774604.692],
            eccentricity: [0.0083, 0.0, 0.0],
            operator_agency: "IPGP".to_string(),
            responsible_agency: "RGP".to_string(),
            observables: "GPS+GLO".to_string(),
        };

        let set = from_period(&period);
        assert_eq!(set.station.as_deref(), Some("ABMF"));
        assert_eq!(set.receiver_type.as_deref(), Some("TRIMBLE NETR9"));
        assert_eq!(set.receiver_fw.as_deref(), Some("5.45"));
        assert_eq!(set.antenna_serial.as_deref(), Some("144"));
        assert_eq!(set.antenna_x_pos, Some(2919785.712));
        assert_eq!(set.antenna_x_delta, Some(0.0083));
        assert_eq!(set.operator.as_deref(), Some("IPGP"));
        assert_eq!(set.agency.as_deref(), Some("RGP"));
        assert_eq!(set.observables.as_deref(), Some("GPS+GLO"));
    }

    #[test]
    fn test_from_overrides_populates_exactly_the_supplied_keys() {
        let overrides = HeaderOverrides::from_pairs(&[
            "receiver_type=SEPT POLARX5",
            "antenna_Y_delta=0.12",
        ])
        .unwrap();

        let set = from_overrides(&overrides);
        assert_eq!(set.receiver_type.as_deref(), Some("SEPT POLARX5"));
        assert_eq!(set.antenna_y_delta, Some(0.12));

        // Everything else stays absent
        assert_eq!(set.station, None);
        assert_eq!(set.receiver_serial, None);
        assert_eq!(set.receiver_fw, None);
        assert_eq!(set.antenna_x_pos, None);
        assert_eq!(set.operator, None);
        assert_eq!(set.observables, None);
    }

    #[test]
    fn test_empty_overrides_yield_empty_set() {
        let set = from_overrides(&HeaderOverrides::default());
        assert!(set.is_empty());
    }
}
