//! CLI entry point: expands the input argument into the batch of files
//! to process and hands them to the orchestrator.

use crate::cli::args::Args;
use crate::config::{HeaderOverrides, RunConfig};
use crate::processor::{self, RunSummary};
use crate::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Run the tool with parsed arguments.
pub fn execute(args: Args) -> Result<RunSummary> {
    let overrides = if args.modification_kw.is_empty() {
        None
    } else {
        Some(HeaderOverrides::from_pairs(&args.modification_kw)?)
    };

    let config = RunConfig {
        output_dir: args.output,
        marker: args.marker,
        rename_long: args.name,
        sitelog: args.sitelog,
        overrides,
        force: args.force,
        ignore_firmware: args.ignore,
        reconstruct: args.reconstruct,
        compression: args.compression.map(Into::into),
        nine_char_file: args.ninecharfile,
        verbose: args.verbose,
    };

    let inputs = expand_input(&args.input, args.lone)?;
    processor::run(&config, &inputs)
}

/// Expand the input argument into the list of files to process: a
/// folder is scanned recursively for RINEX-looking filenames, a list
/// file is read line by line, and --lone takes the path as is.
fn expand_input(input: &Path, lone: bool) -> Result<Vec<PathBuf>> {
    let inputs = if input.is_dir() {
        scan_folder(input)?
    } else if lone {
        vec![input.to_path_buf()]
    } else {
        read_list_file(input)?
    };

    if inputs.is_empty() {
        return Err(Error::configuration(format!(
            "No RINEX file to process in {}",
            input.display()
        )));
    }
    Ok(inputs)
}

fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    // Short and long observation names, with an optional gz/Z wrapping
    let rinex_name = Regex::new(r"(?i)\.(rnx|crx|obs|\d{2}[od])(\.(gz|z))?$").map_err(|e| {
        Error::configuration(format!("Invalid RINEX filename pattern: {}", e))
    })?;

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| rinex_name.is_match(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    Ok(files)
}

fn read_list_file(path: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::io(format!("Could not read input list {}", path.display()), e)
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}
