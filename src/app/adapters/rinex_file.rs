//! Observation file handle
//!
//! Loads a (possibly gzip-wrapped) RINEX observation file, exposes the
//! header metadata the pipeline decides on, applies a reconciled
//! modification set to the fixed-width V3 header records, and persists
//! the result. Every header record the adapter does not touch, and the
//! observation body, are carried through byte-for-byte.

use crate::app::adapters::compression;
use crate::app::models::{CompressionKind, ModificationSet};
use crate::constants::{DAILY_PERIOD, DEFAULT_SAMPLE_RATE};
use crate::{Error, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::debug;

// Header record labels (columns 61-80 of a header line)
const LABEL_VERSION: &str = "RINEX VERSION / TYPE";
const LABEL_MARKER: &str = "MARKER NAME";
const LABEL_RECEIVER: &str = "REC # / TYPE / VERS";
const LABEL_ANTENNA: &str = "ANT # / TYPE";
const LABEL_POSITION: &str = "APPROX POSITION XYZ";
const LABEL_DELTA: &str = "ANTENNA: DELTA H/E/N";
const LABEL_AGENCY: &str = "OBSERVER / AGENCY";
const LABEL_FIRST_OBS: &str = "TIME OF FIRST OBS";
const LABEL_LAST_OBS: &str = "TIME OF LAST OBS";
const LABEL_INTERVAL: &str = "INTERVAL";
const LABEL_COMMENT: &str = "COMMENT";
const LABEL_END: &str = "END OF HEADER";

/// Classified reasons a file cannot be loaded; mapped to stable per-file
/// failure codes by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    /// The path does not point to a readable file
    Missing,
    /// The file is not a RINEX observation file
    NotObservation,
    /// The compression wrapping is invalid or unsupported
    InvalidArchive,
    /// The internal encoding is corrupt (truncated header, non-ASCII
    /// header bytes, Hatanaka-compressed content)
    InvalidEncoding,
}

/// An observation file loaded in memory, with mutable header metadata.
#[derive(Debug, Clone)]
pub struct RinexFile {
    /// Original path the file was loaded from
    pub path: PathBuf,

    /// Current filename, compression extension stripped; renaming
    /// operations rewrite this before the file is persisted
    pub filename: String,

    /// Compression wrapping found on disk
    pub compression: CompressionKind,

    /// Observation start time from TIME OF FIRST OBS
    pub start: NaiveDateTime,

    /// Observation end time from TIME OF LAST OBS (or start + 24h when
    /// the header does not carry it)
    pub end: NaiveDateTime,

    /// File period token derived from the observation window ("01D", ...)
    pub file_period: String,

    /// Sample rate token derived from INTERVAL ("30S", ...)
    pub sample_rate: String,

    header: Vec<String>,
    body: Vec<u8>,
}

impl RinexFile {
    /// Load and classify an observation file.
    pub fn open(path: &Path) -> std::result::Result<Self, LoadFailure> {
        if !path.is_file() {
            return Err(LoadFailure::Missing);
        }

        let compression = CompressionKind::from_path(path);
        let raw = std::fs::read(path).map_err(|_| LoadFailure::Missing)?;
        let data = compression::decompress(&raw, compression)
            .map_err(|_| LoadFailure::InvalidArchive)?;

        let (header, body) = split_header(&data)?;

        let version_line = header.first().ok_or(LoadFailure::InvalidEncoding)?;
        if label_of(version_line).starts_with("CRINEX") {
            // Hatanaka-compressed observation content
            return Err(LoadFailure::InvalidEncoding);
        }
        if label_of(version_line) != LABEL_VERSION || char_at(version_line, 20) != Some('O') {
            return Err(LoadFailure::NotObservation);
        }

        let start = find_content(&header, LABEL_FIRST_OBS)
            .and_then(parse_obs_time)
            .ok_or(LoadFailure::NotObservation)?;

        let end = match find_content(&header, LABEL_LAST_OBS).and_then(parse_obs_time) {
            Some(end) => end,
            None => {
                debug!(
                    "{}: no TIME OF LAST OBS record, assuming a daily file",
                    path.display()
                );
                start + Duration::hours(24)
            }
        };

        let sample_rate = match find_content(&header, LABEL_INTERVAL)
            .and_then(|content| content.trim().parse::<f64>().ok())
        {
            Some(interval) if interval >= 1.0 => format!("{:02.0}S", interval),
            _ => DEFAULT_SAMPLE_RATE.to_string(),
        };

        let file_period = derive_file_period(start, end);

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filename = match compression.extension() {
            Some(ext) => {
                let suffix = format!(".{}", ext);
                filename
                    .strip_suffix(suffix.as_str())
                    .unwrap_or(&filename)
                    .to_string()
            }
            None => filename,
        };

        Ok(Self {
            path: path.to_path_buf(),
            filename,
            compression,
            start,
            end,
            file_period,
            sample_rate,
            header,
            body,
        })
    }

    /// Station marker name from the MARKER NAME record, trimmed.
    pub fn station(&self) -> &str {
        find_content(&self.header, LABEL_MARKER)
            .map(str::trim)
            .unwrap_or("")
    }

    /// One-letter satellite system code from the version record.
    pub fn observable_type(&self) -> char {
        find_content(&self.header, LABEL_VERSION)
            .and_then(|content| content.chars().nth(40))
            .filter(|c| !c.is_whitespace())
            .unwrap_or('M')
    }

    /// Receiver (serial, model, firmware) from the header.
    pub fn receiver(&self) -> (String, String, String) {
        let content = find_content(&self.header, LABEL_RECEIVER).unwrap_or("");
        (
            field(content, 0, 20),
            field(content, 20, 20),
            field(content, 40, 20),
        )
    }

    /// Antenna (serial, model) from the header.
    pub fn antenna(&self) -> (String, String) {
        let content = find_content(&self.header, LABEL_ANTENNA).unwrap_or("");
        (field(content, 0, 20), field(content, 20, 20))
    }

    /// Approximate position X/Y/Z from the header, if present.
    pub fn approx_position(&self) -> Option<[f64; 3]> {
        let content = find_content(&self.header, LABEL_POSITION)?;
        parse_triple(content)
    }

    /// Antenna eccentricity H/E/N from the header, if present.
    pub fn antenna_delta(&self) -> Option<[f64; 3]> {
        let content = find_content(&self.header, LABEL_DELTA)?;
        parse_triple(content)
    }

    /// Observer and agency from the header.
    pub fn agencies(&self) -> (String, String) {
        let content = find_content(&self.header, LABEL_AGENCY).unwrap_or("");
        (field(content, 0, 20), field(content, 20, 40))
    }

    /// Apply a reconciled modification set; each setter only touches the
    /// fields that are present.
    pub fn apply(&mut self, set: &ModificationSet) {
        if let Some(station) = &set.station {
            self.set_marker(station);
        }
        self.set_receiver(
            set.receiver_serial.as_deref(),
            set.receiver_type.as_deref(),
            set.receiver_fw.as_deref(),
        );
        self.set_antenna(set.antenna_serial.as_deref(), set.antenna_type.as_deref());
        self.set_antenna_pos(set.antenna_x_pos, set.antenna_y_pos, set.antenna_z_pos);
        self.set_antenna_delta(set.antenna_x_delta, set.antenna_y_delta, set.antenna_z_delta);
        self.set_agencies(set.operator.as_deref(), set.agency.as_deref());
        if let Some(observables) = &set.observables {
            self.set_observable_type(observables);
        }
    }

    /// Replace the MARKER NAME record.
    pub fn set_marker(&mut self, station: &str) {
        self.set_field(LABEL_MARKER, 0, 60, station);
    }

    /// Replace receiver serial, model and firmware; absent values keep
    /// the current field.
    pub fn set_receiver(&mut self, serial: Option<&str>, model: Option<&str>, fw: Option<&str>) {
        if let Some(serial) = serial {
            self.set_field(LABEL_RECEIVER, 0, 20, serial);
        }
        if let Some(model) = model {
            self.set_field(LABEL_RECEIVER, 20, 20, model);
        }
        if let Some(fw) = fw {
            self.set_field(LABEL_RECEIVER, 40, 20, fw);
        }
    }

    /// Replace antenna serial and model.
    pub fn set_antenna(&mut self, serial: Option<&str>, model: Option<&str>) {
        if let Some(serial) = serial {
            self.set_field(LABEL_ANTENNA, 0, 20, serial);
        }
        if let Some(model) = model {
            self.set_field(LABEL_ANTENNA, 20, 20, model);
        }
    }

    /// Replace approximate position components (meters).
    pub fn set_antenna_pos(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) {
        for (i, value) in [x, y, z].into_iter().enumerate() {
            if let Some(value) = value {
                self.set_field(LABEL_POSITION, i * 14, 14, &format!("{:14.4}", value));
            }
        }
    }

    /// Replace antenna eccentricity components H/E/N (meters).
    pub fn set_antenna_delta(&mut self, h: Option<f64>, e: Option<f64>, n: Option<f64>) {
        for (i, value) in [h, e, n].into_iter().enumerate() {
            if let Some(value) = value {
                self.set_field(LABEL_DELTA, i * 14, 14, &format!("{:14.4}", value));
            }
        }
    }

    /// Replace observer and agency.
    pub fn set_agencies(&mut self, observer: Option<&str>, agency: Option<&str>) {
        if let Some(observer) = observer {
            self.set_field(LABEL_AGENCY, 0, 20, observer);
        }
        if let Some(agency) = agency {
            self.set_field(LABEL_AGENCY, 20, 40, agency);
        }
    }

    /// Replace the satellite system code of the version record. The
    /// token may be a system name ("GPS"), a combination ("GPS+GLO",
    /// translated to mixed) or an already translated one-letter code.
    pub fn set_observable_type(&mut self, token: &str) {
        let code = system_code(token);
        self.set_field(LABEL_VERSION, 40, 20, &system_description(code));
    }

    /// Append an audit COMMENT record just before END OF HEADER.
    pub fn add_comment(&mut self, text: &str) {
        let line = format!("{:<60}{}", truncate_ascii(text, 60), LABEL_COMMENT);
        let end = self
            .header
            .iter()
            .position(|l| label_of(l) == LABEL_END)
            .unwrap_or(self.header.len());
        self.header.insert(end, line);
    }

    /// Multi-line header metadata snapshot for verbose logging.
    pub fn metadata_summary(&self) -> String {
        let (rec_serial, rec_model, rec_fw) = self.receiver();
        let (ant_serial, ant_model) = self.antenna();
        let (observer, agency) = self.agencies();
        format!(
            "File           : {}\n\
             Station        : {}\n\
             Start          : {}\n\
             End            : {}\n\
             Period         : {}\n\
             Sample rate    : {}\n\
             Observables    : {}\n\
             Receiver       : {} | {} | {}\n\
             Antenna        : {} | {}\n\
             Position       : {:?}\n\
             Eccentricity   : {:?}\n\
             Observer/agency: {} | {}",
            self.filename,
            self.station(),
            self.start,
            self.end,
            self.file_period,
            self.sample_rate,
            self.observable_type(),
            rec_serial,
            rec_model,
            rec_fw,
            ant_serial,
            ant_model,
            self.approx_position(),
            self.antenna_delta(),
            observer,
            agency,
        )
    }

    /// Persist the file into `dir` under its current filename, with the
    /// requested compression kind.
    pub fn write_to_path(&self, dir: &Path, compression: CompressionKind) -> Result<PathBuf> {
        let mut name = self.filename.clone();
        if let Some(ext) = compression.extension() {
            name.push('.');
            name.push_str(ext);
        }
        let output = dir.join(name);

        let mut data = self.header.join("\n").into_bytes();
        data.push(b'\n');
        data.extend_from_slice(&self.body);

        compression::write_file(&output, &data, compression).map_err(|e| {
            Error::io(format!("Could not write output file {}", output.display()), e)
        })?;

        Ok(output)
    }

    /// Replace `width` columns starting at `col` of the record carrying
    /// `label`, inserting the record before END OF HEADER when absent.
    fn set_field(&mut self, label: &str, col: usize, width: usize, value: &str) {
        let index = match self.header.iter().position(|l| label_of(l) == label) {
            Some(index) => index,
            None => {
                let end = self
                    .header
                    .iter()
                    .position(|l| label_of(l) == LABEL_END)
                    .unwrap_or(self.header.len());
                self.header.insert(end, format!("{:<60}{}", "", label));
                end
            }
        };
        self.header[index] = splice(&self.header[index], col, width, value);
    }
}

/// Split decoded file content into header lines and the raw body.
fn split_header(data: &[u8]) -> std::result::Result<(Vec<String>, Vec<u8>), LoadFailure> {
    let mut header = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let line_end = data[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|p| offset + p)
            .unwrap_or(data.len());
        let line_bytes = &data[offset..line_end];
        let line_bytes = line_bytes.strip_suffix(b"\r").unwrap_or(line_bytes);

        let line = std::str::from_utf8(line_bytes).map_err(|_| LoadFailure::InvalidEncoding)?;
        if !line.is_ascii() {
            return Err(LoadFailure::InvalidEncoding);
        }
        let done = label_of(line) == LABEL_END;
        header.push(line.to_string());
        offset = line_end.saturating_add(1).min(data.len() + 1);

        if done {
            let body_start = offset.min(data.len());
            return Ok((header, data[body_start..].to_vec()));
        }
    }

    // Ran out of data before END OF HEADER
    Err(LoadFailure::InvalidEncoding)
}

/// Header label: columns 61-80, trimmed.
fn label_of(line: &str) -> &str {
    if line.len() > 60 { line[60..].trim() } else { "" }
}

fn char_at(line: &str, col: usize) -> Option<char> {
    line.chars().nth(col)
}

/// Content (columns 1-60) of the first record carrying `label`.
fn find_content<'a>(header: &'a [String], label: &str) -> Option<&'a str> {
    header
        .iter()
        .find(|line| label_of(line) == label)
        .map(|line| &line[..line.len().min(60)])
}

/// Fixed-width sub-field of a content region, trimmed.
fn field(content: &str, col: usize, width: usize) -> String {
    let start = col.min(content.len());
    let end = (col + width).min(content.len());
    content[start..end].trim().to_string()
}

/// Parse a "  2021     3    15    13    45    0.0000000" time record.
fn parse_obs_time(content: &str) -> Option<NaiveDateTime> {
    let mut tokens = content.split_whitespace();
    let year: i32 = tokens.next()?.parse().ok()?;
    let month: u32 = tokens.next()?.parse().ok()?;
    let day: u32 = tokens.next()?.parse().ok()?;
    let hour: u32 = tokens.next()?.parse().ok()?;
    let minute: u32 = tokens.next()?.parse().ok()?;
    let second: f64 = tokens.next()?.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second as u32)
}

/// Parse three fixed-width F14.4 values.
fn parse_triple(content: &str) -> Option<[f64; 3]> {
    let x: f64 = field(content, 0, 14).parse().ok()?;
    let y: f64 = field(content, 14, 14).parse().ok()?;
    let z: f64 = field(content, 28, 14).parse().ok()?;
    Some([x, y, z])
}

/// Derive the file period token from the observation window.
fn derive_file_period(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let duration = end - start;
    if duration >= Duration::hours(23) {
        DAILY_PERIOD.to_string()
    } else if duration >= Duration::hours(1) {
        format!("{:02}H", duration.num_hours())
    } else {
        format!("{:02}M", duration.num_minutes().max(1))
    }
}

/// Splice `value` into columns `[col, col+width)` of a header line,
/// preserving the label region.
fn splice(line: &str, col: usize, width: usize, value: &str) -> String {
    let mut content: String = line.chars().take(60).collect();
    while content.len() < 60 {
        content.push(' ');
    }
    let label = if line.len() > 60 { &line[60..] } else { "" };

    let formatted = format!("{:<width$}", truncate_ascii(value, width), width = width);
    let mut bytes = content.into_bytes();
    bytes[col..col + width].copy_from_slice(formatted.as_bytes());

    format!("{}{}", String::from_utf8_lossy(&bytes), label)
}

/// Keep at most `width` ASCII characters of a value; non-ASCII bytes
/// cannot enter a RINEX header.
fn truncate_ascii(value: &str, width: usize) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii() && *c != '\n' && *c != '\r')
        .take(width)
        .collect()
}

/// Translate a satellite system token to its one-letter RINEX code.
fn system_code(token: &str) -> char {
    let token = token.trim().to_uppercase();
    if token.contains('+') {
        return 'M';
    }
    match token.as_str() {
        "GPS" | "G" => 'G',
        "GLO" | "GLONASS" | "R" => 'R',
        "GAL" | "GALILEO" | "E" => 'E',
        "BDS" | "BEIDOU" | "COMPASS" | "C" => 'C',
        "QZSS" | "J" => 'J',
        "IRNSS" | "NAVIC" | "I" => 'I',
        "SBAS" | "S" => 'S',
        _ => 'M',
    }
}

/// Display form of a system code for the version record.
fn system_description(code: char) -> String {
    let name = match code {
        'G' => "GPS",
        'R' => "GLONASS",
        'E' => "GALILEO",
        'C' => "BEIDOU",
        'J' => "QZSS",
        'I' => "IRNSS",
        'S' => "SBAS",
        _ => "MIXED",
    };
    format!("{} ({})", code, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn header_line(content: &str, label: &str) -> String {
        format!("{:<60}{}", content, label)
    }

    fn sample_rinex(station: &str) -> String {
        let mut lines = vec![
            header_line(
                &format!("{:<20}{:<20}{:<20}", "     3.04", "OBSERVATION DATA", "M (MIXED)"),
                LABEL_VERSION,
            ),
            header_line(station, LABEL_MARKER),
            header_line(
                &format!("{:<20}{:<20}{:<20}", "1847", "LEICA GR25", "4.02"),
                LABEL_RECEIVER,
            ),
            header_line(
                &format!("{:<20}{:<20}", "725015", "LEIAR25.R4 LEIT"),
                LABEL_ANTENNA,
            ),
            header_line(
                &format!("{:14.4}{:14.4}{:14.4}", 2919785.712, -5383745.067, 1774604.692),
                LABEL_POSITION,
            ),
            header_line(
                &format!("{:14.4}{:14.4}{:14.4}", 0.0083, 0.0, 0.0),
                LABEL_DELTA,
            ),
            header_line(
                &format!("{:<20}{:<40}", "Automatic", "IPGP"),
                LABEL_AGENCY,
            ),
            header_line("        30.000", LABEL_INTERVAL),
            header_line(
                "  2021     3    15     0     0    0.0000000     GPS",
                LABEL_FIRST_OBS,
            ),
            header_line(
                "  2021     3    15    23    59   30.0000000     GPS",
                LABEL_LAST_OBS,
            ),
            header_line("", LABEL_END),
        ];
        lines.push("> 2021 03 15 00 00  0.0000000  0  8".to_string());
        lines.join("\n") + "\n"
    }

    fn write_sample(dir: &Path, name: &str, station: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, sample_rinex(station)).unwrap();
        path
    }

    #[test]
    fn test_open_reads_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_sample(temp_dir.path(), "abmf0740.21o", "ABMF");

        let file = RinexFile::open(&path).unwrap();
        assert_eq!(file.station(), "ABMF");
        assert_eq!(file.filename, "abmf0740.21o");
        assert_eq!(file.compression, CompressionKind::Plain);
        assert_eq!(file.file_period, "01D");
        assert_eq!(file.sample_rate, "30S");
        assert_eq!(file.observable_type(), 'M');
        assert_eq!(
            file.start,
            NaiveDate::from_ymd_opt(2021, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(file.receiver().1, "LEICA GR25");
        assert_eq!(file.approx_position().unwrap()[0], 2919785.712);
    }

    #[test]
    fn test_open_missing_file() {
        assert_eq!(
            RinexFile::open(Path::new("/nonexistent/abmf0740.21o")).unwrap_err(),
            LoadFailure::Missing
        );
    }

    #[test]
    fn test_open_rejects_non_observation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("brdc0740.21n");
        let content = format!(
            "{}\n{}\n",
            header_line(
                &format!("{:<20}{:<20}{:<20}", "     3.04", "NAVIGATION DATA", "M"),
                LABEL_VERSION
            ),
            header_line("", LABEL_END),
        );
        std::fs::write(&path, content).unwrap();

        assert_eq!(RinexFile::open(&path).unwrap_err(), LoadFailure::NotObservation);
    }

    #[test]
    fn test_open_rejects_corrupt_gzip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abmf0740.21o.gz");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        assert_eq!(RinexFile::open(&path).unwrap_err(), LoadFailure::InvalidArchive);
    }

    #[test]
    fn test_open_rejects_truncated_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abmf0740.21o");
        let content = header_line(
            &format!("{:<20}{:<20}{:<20}", "     3.04", "OBSERVATION DATA", "M"),
            LABEL_VERSION,
        );
        std::fs::write(&path, content).unwrap();

        assert_eq!(RinexFile::open(&path).unwrap_err(), LoadFailure::InvalidEncoding);
    }

    #[test]
    fn test_gzip_round_trip_preserves_body() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abmf0740.21o.gz");
        let data = sample_rinex("ABMF");
        compression::write_file(&path, data.as_bytes(), CompressionKind::Gzip).unwrap();

        let file = RinexFile::open(&path).unwrap();
        assert_eq!(file.compression, CompressionKind::Gzip);
        assert_eq!(file.filename, "abmf0740.21o");

        let out_dir = temp_dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        let written = file.write_to_path(&out_dir, CompressionKind::Plain).unwrap();
        assert_eq!(std::fs::read_to_string(written).unwrap(), data);
    }

    #[test]
    fn test_apply_round_trips_every_present_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_sample(temp_dir.path(), "abmf0740.21o", "ABMF");
        let mut file = RinexFile::open(&path).unwrap();

        let set = ModificationSet {
            station: Some("AGAL".to_string()),
            receiver_serial: Some("5033K".to_string()),
            receiver_type: Some("TRIMBLE NETR9".to_string()),
            receiver_fw: Some("5.45".to_string()),
            antenna_serial: Some("144".to_string()),
            antenna_type: Some("TRM57971.00 NONE".to_string()),
            antenna_x_pos: Some(1.0),
            antenna_y_pos: Some(-2.5),
            antenna_z_pos: Some(3.25),
            antenna_x_delta: Some(0.1),
            antenna_y_delta: Some(0.2),
            antenna_z_delta: Some(0.3),
            operator: Some("OVSG".to_string()),
            agency: Some("RGP".to_string()),
            observables: Some("GPS".to_string()),
        };
        file.apply(&set);

        assert_eq!(file.station(), "AGAL");
        assert_eq!(
            file.receiver(),
            (
                "5033K".to_string(),
                "TRIMBLE NETR9".to_string(),
                "5.45".to_string()
            )
        );
        assert_eq!(
            file.antenna(),
            ("144".to_string(), "TRM57971.00 NONE".to_string())
        );
        assert_eq!(file.approx_position(), Some([1.0, -2.5, 3.25]));
        assert_eq!(file.antenna_delta(), Some([0.1, 0.2, 0.3]));
        assert_eq!(file.agencies(), ("OVSG".to_string(), "RGP".to_string()));
        assert_eq!(file.observable_type(), 'G');

        // Persist and re-read: applied values survive the round trip
        let out_dir = temp_dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        let written = file.write_to_path(&out_dir, CompressionKind::Plain).unwrap();
        let reread = RinexFile::open(&written).unwrap();
        assert_eq!(reread.station(), "AGAL");
        assert_eq!(reread.receiver().2, "5.45");
        assert_eq!(reread.approx_position(), Some([1.0, -2.5, 3.25]));
    }

    #[test]
    fn test_partial_set_leaves_other_fields_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_sample(temp_dir.path(), "abmf0740.21o", "ABMF");
        let mut file = RinexFile::open(&path).unwrap();

        file.apply(&ModificationSet {
            receiver_fw: Some("4.50".to_string()),
            ..Default::default()
        });

        assert_eq!(
            file.receiver(),
            (
                "1847".to_string(),
                "LEICA GR25".to_string(),
                "4.50".to_string()
            )
        );
        assert_eq!(file.station(), "ABMF");
        assert_eq!(file.agencies().1, "IPGP");
    }

    #[test]
    fn test_add_comment_before_end_of_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_sample(temp_dir.path(), "abmf0740.21o", "ABMF");
        let mut file = RinexFile::open(&path).unwrap();

        file.add_comment("rinexmoded on 2021-03-16 10:00");
        let out_dir = temp_dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        let written = file.write_to_path(&out_dir, CompressionKind::Plain).unwrap();

        let content = std::fs::read_to_string(written).unwrap();
        let comment_pos = content.find("rinexmoded on").unwrap();
        let end_pos = content.find(LABEL_END).unwrap();
        assert!(comment_pos < end_pos);
        assert!(content.lines().any(|l| label_of(l) == LABEL_COMMENT));
    }

    #[test]
    fn test_file_period_derivation() {
        let start = NaiveDate::from_ymd_opt(2021, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(derive_file_period(start, start + Duration::hours(24)), "01D");
        assert_eq!(derive_file_period(start, start + Duration::hours(1)), "01H");
        assert_eq!(
            derive_file_period(start, start + Duration::minutes(15)),
            "15M"
        );
    }

    #[test]
    fn test_system_code_translation() {
        assert_eq!(system_code("GPS"), 'G');
        assert_eq!(system_code("glonass"), 'R');
        assert_eq!(system_code("GPS+GLO"), 'M');
        assert_eq!(system_code("MIXED"), 'M');
        assert_eq!(system_code("E"), 'E');
    }
}
