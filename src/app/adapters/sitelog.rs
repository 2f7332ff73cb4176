//! IGS site log parser
//!
//! Reads the sections of an IGS-format site log the remediation
//! pipeline needs (site identification, coordinates, receiver and
//! antenna installation blocks, agency contacts) and assembles them
//! into a chronological list of instrumentation periods.

use crate::app::models::{Antenna, InstrumentationPeriod, Receiver};
use crate::constants::SITELOG_DATE_FORMATS;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// A parsed site log: station identity plus its instrumentation history.
#[derive(Debug, Clone)]
pub struct StationLog {
    /// Site log filename, recorded in audit comments of modified files
    pub filename: String,

    /// Four-character site code from section 1, uppercased
    pub station: String,

    /// Instrumentation periods sorted by start time
    pub periods: Vec<InstrumentationPeriod>,
}

#[derive(Debug, Default, Clone)]
struct ReceiverBlock {
    model: String,
    serial: String,
    firmware: String,
    satellite_system: String,
    installed: Option<NaiveDateTime>,
    removed: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Clone)]
struct AntennaBlock {
    model: String,
    serial: String,
    eccentricity: [f64; 3],
    installed: Option<NaiveDateTime>,
    removed: Option<NaiveDateTime>,
}

impl StationLog {
    /// Parse a site log file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Could not read sitelog {}", path.display()), e)
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::parse(&filename, &content)
    }

    fn parse(filename: &str, content: &str) -> Result<Self> {
        // Section headers look like "3.2  Receiver Type" or "1.   Site
        // Identification of the GNSS Monument"
        let section_re = Regex::new(r"^(\d+)\.(?:(\d+|x)\.?)?\s").map_err(|e| {
            Error::configuration(format!("Invalid sitelog section pattern: {}", e))
        })?;

        let mut station = String::new();
        let mut position = [0.0f64; 3];
        let mut operator_agency = String::new();
        let mut responsible_agency = String::new();
        let mut receivers: Vec<ReceiverBlock> = Vec::new();
        let mut antennas: Vec<AntennaBlock> = Vec::new();

        // (major, minor) of the block being read; minor 0 for non-
        // numbered sections
        let mut section: (u32, u32) = (0, 0);

        for line in content.lines() {
            let mut line = line;
            if let Some(caps) = section_re.captures(line) {
                let major: u32 = caps[1].parse().unwrap_or(0);
                let minor: u32 = caps
                    .get(2)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0);
                section = (major, minor);
                // Template blocks ("3.x") carry no data
                if caps.get(2).is_some_and(|m| m.as_str() == "x") {
                    section = (0, 0);
                    continue;
                }
                if major == 3 && minor > 0 {
                    receivers.push(ReceiverBlock::default());
                }
                if major == 4 && minor > 0 {
                    antennas.push(AntennaBlock::default());
                }
                // Numbered block headers carry the first entry on the
                // same line ("3.1  Receiver Type : LEICA GR25")
                line = &line[caps.get(0).map_or(0, |m| m.end())..];
            }

            let Some((key, value)) = split_entry(line) else {
                continue;
            };

            match section {
                (1, _) => {
                    if key == "Four Character ID" {
                        station = value.to_uppercase();
                    }
                }
                (2, _) => match key {
                    "X coordinate (m)" => position[0] = parse_coordinate(value),
                    "Y coordinate (m)" => position[1] = parse_coordinate(value),
                    "Z coordinate (m)" => position[2] = parse_coordinate(value),
                    _ => {}
                },
                (3, minor) if minor > 0 => {
                    if let Some(block) = receivers.last_mut() {
                        match key {
                            "Receiver Type" => block.model = value.to_string(),
                            "Serial Number" => block.serial = value.to_string(),
                            "Firmware Version" => block.firmware = value.to_string(),
                            "Satellite System" => block.satellite_system = value.to_string(),
                            "Date Installed" => block.installed = parse_date(value),
                            "Date Removed" => block.removed = parse_date(value),
                            _ => {}
                        }
                    }
                }
                (4, minor) if minor > 0 => {
                    if let Some(block) = antennas.last_mut() {
                        match key {
                            "Antenna Type" => block.model = value.to_string(),
                            "Serial Number" => block.serial = value.to_string(),
                            "Marker->ARP Up Ecc. (m)" => {
                                block.eccentricity[0] = parse_coordinate(value)
                            }
                            "Marker->ARP North Ecc(m)" => {
                                block.eccentricity[2] = parse_coordinate(value)
                            }
                            "Marker->ARP East Ecc(m)" => {
                                block.eccentricity[1] = parse_coordinate(value)
                            }
                            "Date Installed" => block.installed = parse_date(value),
                            "Date Removed" => block.removed = parse_date(value),
                            _ => {}
                        }
                    }
                }
                (11, _) => {
                    if key == "Preferred Abbreviation" && operator_agency.is_empty() {
                        operator_agency = value.to_string();
                    }
                }
                (12, _) => {
                    if key == "Preferred Abbreviation" && responsible_agency.is_empty() {
                        responsible_agency = value.to_string();
                    }
                }
                _ => {}
            }
        }

        if station.is_empty() {
            return Err(Error::sitelog(filename, "No Four Character ID found"));
        }
        receivers.retain(|r| r.installed.is_some());
        antennas.retain(|a| a.installed.is_some());
        if receivers.is_empty() || antennas.is_empty() {
            return Err(Error::sitelog(
                filename,
                "No dated receiver or antenna installation blocks",
            ));
        }

        let periods = assemble_periods(
            &station,
            position,
            &operator_agency,
            &responsible_agency,
            &receivers,
            &antennas,
        );
        debug!(
            "{}: {} instrumentation periods for {}",
            filename,
            periods.len(),
            station
        );

        Ok(Self {
            filename: filename.to_string(),
            station,
            periods,
        })
    }
}

/// Build one instrumentation period per receiver/antenna installation
/// boundary. Boundaries are the union of install dates; each window
/// pairs the receiver and antenna covering it.
fn assemble_periods(
    station: &str,
    position: [f64; 3],
    operator_agency: &str,
    responsible_agency: &str,
    receivers: &[ReceiverBlock],
    antennas: &[AntennaBlock],
) -> Vec<InstrumentationPeriod> {
    let mut boundaries: Vec<NaiveDateTime> = receivers
        .iter()
        .filter_map(|r| r.installed)
        .chain(antennas.iter().filter_map(|a| a.installed))
        .collect();
    boundaries.sort();
    boundaries.dedup();

    let mut periods = Vec::new();
    for (i, &start) in boundaries.iter().enumerate() {
        let next_boundary = boundaries.get(i + 1).copied();

        let receiver = receivers
            .iter()
            .filter(|r| covers(r.installed, r.removed, start))
            .next_back();
        let antenna = antennas
            .iter()
            .filter(|a| covers(a.installed, a.removed, start))
            .next_back();
        let (Some(receiver), Some(antenna)) = (receiver, antenna) else {
            continue;
        };

        // Closed either by the next installation or by the equipment's
        // own removal date, whichever comes first
        let end = [next_boundary, receiver.removed, antenna.removed]
            .into_iter()
            .flatten()
            .min();

        // The receiver block declares which satellite systems it tracks
        let observables = if receiver.satellite_system.is_empty() {
            "MIXED".to_string()
        } else {
            receiver.satellite_system.clone()
        };

        periods.push(InstrumentationPeriod {
            station: station.to_string(),
            start,
            end,
            receiver: Receiver {
                model: receiver.model.clone(),
                serial: receiver.serial.clone(),
                firmware: receiver.firmware.clone(),
            },
            antenna: Antenna {
                model: antenna.model.clone(),
                serial: antenna.serial.clone(),
            },
            position,
            eccentricity: antenna.eccentricity,
            operator_agency: operator_agency.to_string(),
            responsible_agency: responsible_agency.to_string(),
            observables,
        });
    }
    periods
}

fn covers(installed: Option<NaiveDateTime>, removed: Option<NaiveDateTime>, at: NaiveDateTime) -> bool {
    installed.is_some_and(|i| i <= at) && removed.is_none_or(|r| r > at)
}

/// Split a "Key              : value" line.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(" : ")?;
    let key = key.trim();
    let value = value.trim();
    (!key.is_empty() && !value.is_empty()).then_some((key, value))
}

/// Parse a sitelog date; placeholder values ("CCYY-MM-DD", empty) give
/// None, meaning an open-ended installation.
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() || value.contains("CCYY") {
        return None;
    }
    for format in SITELOG_DATE_FORMATS.iter().copied() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
        if let Ok(date) = chrono::NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn parse_coordinate(value: &str) -> f64 {
    value
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .unwrap_or(0.0)
}
