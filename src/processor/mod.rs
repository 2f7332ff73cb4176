//! Batch remediation orchestrator
//!
//! Drives the per-file pipeline: load and classify each observation
//! file, reconcile its header against the chosen metadata source
//! (site log or command-line overrides), rename it, and persist the
//! result into the output directory. Per-file failures are logged with
//! their classification code and never abort the batch.

pub mod failure;
pub mod logging;

use crate::app::adapters::rinex_file::{LoadFailure, RinexFile};
use crate::app::adapters::sitelog::StationLog;
use crate::app::models::ModificationSet;
use crate::app::services::periods::{self, PeriodMatch};
use crate::app::services::site_index::NineCharIndex;
use crate::app::services::{naming, reconciler};
use crate::config::RunConfig;
use crate::constants::{
    AUDIT_TIMESTAMP_FORMAT, COMMAND_LINE_SOURCE, SITE_CODE_LEN, UNKNOWN_COUNTRY_SUFFIX,
};
use crate::processor::failure::FailureKind;
use crate::processor::logging::RunLogger;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Outcome of a batch run.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of input files considered
    pub files_seen: usize,

    /// Number of files written to the output directory
    pub files_written: usize,

    /// Number of files skipped with a classified failure
    pub files_skipped: usize,

    /// Number of warnings raised (files still written)
    pub warnings: usize,

    /// Path of the run's log file
    pub log_path: PathBuf,

    /// Wall-clock duration of the run
    pub elapsed: std::time::Duration,
}

/// Metadata sources resolved once per run.
struct RunContext {
    sitelog: Option<StationLog>,
    nine_char: Option<NineCharIndex>,
}

/// Remediate a batch of observation files.
pub fn run(config: &RunConfig, inputs: &[PathBuf]) -> Result<RunSummary> {
    let started = Instant::now();
    let config_warnings = config.validate()?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        Error::io(
            format!(
                "Could not create output directory {}",
                config.output_dir.display()
            ),
            e,
        )
    })?;

    let logger = RunLogger::init(&config.output_dir, config.verbose)?;
    info!("rinexmod run: {} input file(s)", inputs.len());
    for warning in &config_warnings {
        warn!("{}", warning);
    }

    let context = RunContext {
        sitelog: config
            .sitelog
            .as_deref()
            .map(StationLog::load)
            .transpose()?,
        nine_char: config
            .nine_char_file
            .as_deref()
            .map(NineCharIndex::load)
            .transpose()?,
    };
    if let Some(log) = &context.sitelog {
        info!(
            "Sitelog {}: station {}, {} instrumentation period(s)",
            log.filename,
            log.station,
            log.periods.len()
        );
    }

    // Verbose runs log every header snapshot; a bar would fight them
    let progress = if config.verbose {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(inputs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
        );
        bar
    };

    let mut summary = RunSummary {
        files_seen: inputs.len(),
        files_written: 0,
        files_skipped: 0,
        warnings: 0,
        log_path: logger.path.clone(),
        elapsed: std::time::Duration::ZERO,
    };

    for input in inputs {
        progress.set_message(
            input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        match process_file(config, &context, input) {
            Ok(file_warnings) => {
                summary.files_written += 1;
                summary.warnings += file_warnings;
            }
            Err(Skip::Classified(kind)) => {
                error!("{} - {} - {}", kind.code(), kind, input.display());
                summary.files_skipped += 1;
            }
            Err(Skip::Io(e)) => {
                error!("{} - {}", e, input.display());
                summary.files_skipped += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    summary.elapsed = started.elapsed();
    info!(
        "Done: {} written, {} skipped, {} warning(s) in {:.2?} (log: {})",
        summary.files_written,
        summary.files_skipped,
        summary.warnings,
        summary.elapsed,
        summary.log_path.display()
    );
    Ok(summary)
}

/// Why a file was skipped: a classified pipeline failure, or a plain
/// I/O error while persisting.
enum Skip {
    Classified(FailureKind),
    Io(Error),
}

impl From<FailureKind> for Skip {
    fn from(kind: FailureKind) -> Self {
        Self::Classified(kind)
    }
}

/// Run the pipeline on one file; returns the number of warnings raised.
fn process_file(
    config: &RunConfig,
    context: &RunContext,
    input: &Path,
) -> std::result::Result<usize, Skip> {
    let mut warnings = 0usize;

    if same_directory(input, &config.output_dir) {
        return Err(FailureKind::SameDirectory.into());
    }

    let output_dir = resolve_output_dir(config, input)?;

    let mut file = RinexFile::open(input).map_err(|failure| match failure {
        LoadFailure::Missing => FailureKind::MissingFile,
        LoadFailure::NotObservation => FailureKind::NotObservation,
        LoadFailure::InvalidArchive => FailureKind::InvalidArchive,
        LoadFailure::InvalidEncoding => FailureKind::InvalidEncoding,
    })?;

    if config.verbose {
        debug!("Header before modification:\n{}", file.metadata_summary());
    }

    let (modifications, source) = reconcile(config, context, &file, &mut warnings)?;

    if !modifications.is_empty() {
        file.apply(&modifications);
    }
    let timestamp = chrono::Local::now().format(AUDIT_TIMESTAMP_FORMAT);
    file.add_comment(&format!("rinexmoded on {}", timestamp));
    if let Some(source) = &source {
        file.add_comment(&format!("rinexmoded from {}", source));
    }
    if config.marker.is_some() {
        file.add_comment(&format!(
            "file assigned from {}",
            source.as_deref().unwrap_or(COMMAND_LINE_SOURCE)
        ));
    }

    rename(config, context, &mut file, &mut warnings);

    if config.verbose {
        debug!("Header after modification:\n{}", file.metadata_summary());
    }

    let compression = config.compression.unwrap_or(file.compression);
    let written = file
        .write_to_path(&output_dir, compression)
        .map_err(Skip::Io)?;
    info!("{} -> {}", input.display(), written.display());
    Ok(warnings)
}

/// Output directory for one file, reconstructing the input subtree
/// below the --reconstruct prefix when asked to.
fn resolve_output_dir(
    config: &RunConfig,
    input: &Path,
) -> std::result::Result<PathBuf, FailureKind> {
    let Some(prefix) = &config.reconstruct else {
        return Ok(config.output_dir.clone());
    };

    let parent = input.parent().unwrap_or(Path::new(""));
    let relative = parent.strip_prefix(prefix).map_err(|_| {
        FailureKind::Unreconstructable {
            prefix: prefix.clone(),
        }
    })?;

    let output_dir = config.output_dir.join(relative);
    std::fs::create_dir_all(&output_dir).map_err(|_| FailureKind::Unreconstructable {
        prefix: prefix.clone(),
    })?;
    Ok(output_dir)
}

/// True when the file already lives in the output directory.
fn same_directory(input: &Path, output_dir: &Path) -> bool {
    let parent = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), output_dir.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => parent == output_dir,
    }
}

/// Build the modification set from the run's metadata source, plus the
/// source name recorded in the audit comment.
fn reconcile(
    config: &RunConfig,
    context: &RunContext,
    file: &RinexFile,
    warnings: &mut usize,
) -> std::result::Result<(ModificationSet, Option<String>), FailureKind> {
    let mut set = ModificationSet::default();
    let mut source = None;

    if let Some(log) = &context.sitelog {
        check_station(file, log, config.force, warnings)?;

        match periods::resolve(&log.periods, file.start, file.end, config.ignore_firmware) {
            PeriodMatch::NoCoverage => {
                return Err(FailureKind::NoPeriod {
                    detail: format!(
                        "no period covers {} - {}",
                        file.start, file.end
                    ),
                });
            }
            PeriodMatch::Ambiguous { count } => {
                return Err(FailureKind::NoPeriod {
                    detail: format!(
                        "{} differing periods cover {} - {} (consider --ignore)",
                        count, file.start, file.end
                    ),
                });
            }
            PeriodMatch::Single(period) => {
                set = reconciler::from_period(period);
            }
            PeriodMatch::Merged {
                base,
                count,
                inconsistent,
            } => {
                let kind = FailureKind::MergedPeriods { count };
                warn!("{} - {} - {}", kind.code(), kind, file.filename);
                *warnings += 1;
                if inconsistent {
                    warn!(
                        "{} - merged periods differ beyond firmware - {}",
                        kind.code(),
                        file.filename
                    );
                    *warnings += 1;
                }
                set = reconciler::from_period(base);
            }
        }
        source = Some(log.filename.clone());
    }

    if let Some(overrides) = &config.overrides {
        set = reconciler::from_overrides(overrides);
        source = Some(COMMAND_LINE_SOURCE.to_string());
    }

    // The marker renames the file only; MARKER NAME stays whatever the
    // metadata source (or the original header) says
    Ok((set, source))
}

/// Station consistency check between the file header and the site log;
/// --force downgrades a mismatch to a warning.
fn check_station(
    file: &RinexFile,
    log: &StationLog,
    force: bool,
    warnings: &mut usize,
) -> std::result::Result<(), FailureKind> {
    let file_station: String = file
        .station()
        .chars()
        .take(SITE_CODE_LEN)
        .collect::<String>()
        .to_uppercase();
    let log_station: String = log.station.chars().take(SITE_CODE_LEN).collect();

    if file_station == log_station {
        return Ok(());
    }
    if force {
        let kind = FailureKind::MismatchForced {
            file: file_station,
            sitelog: log_station,
        };
        warn!("{} - {} - {}", kind.code(), kind, file.filename);
        *warnings += 1;
        return Ok(());
    }
    Err(FailureKind::StationMismatch {
        file: file_station,
        sitelog: log_station,
    })
}

/// Apply the filename operations: marker substitution and the
/// long-name convention.
fn rename(
    config: &RunConfig,
    context: &RunContext,
    file: &mut RinexFile,
    warnings: &mut usize,
) {
    if let Some(marker) = &config.marker {
        let rest: String = file.filename.chars().skip(SITE_CODE_LEN).collect();
        file.filename = format!("{}{}", marker.to_lowercase(), rest);
    }

    if !config.rename_long {
        return;
    }

    let site: String = file
        .filename
        .chars()
        .take(SITE_CODE_LEN)
        .collect::<String>()
        .to_uppercase();
    let site_id = match context.nine_char.as_ref().and_then(|index| index.lookup(&site)) {
        Some(long_id) => long_id.to_uppercase(),
        None => {
            let kind = FailureKind::UnresolvedCountry { site: site.clone() };
            warn!("{} - {} - {}", kind.code(), kind, file.filename);
            *warnings += 1;
            format!("{}{}", site, UNKNOWN_COUNTRY_SUFFIX)
        }
    };

    file.filename = naming::long_name(
        &site_id,
        file.start,
        &file.file_period,
        &file.sample_rate,
        &file.observable_type().to_string(),
    );
}
