//! Command-line interface definition

use crate::app::models::CompressionKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Batch-corrects RINEX observation file headers from an IGS site log
/// or from command-line key=value pairs, optionally renaming the files
/// to the long naming convention, and writes the results to an output
/// folder. Files are never modified in place.
#[derive(Parser, Debug)]
#[command(name = "rinexmod", version, about, long_about = None)]
pub struct Args {
    /// Input: a file containing a list of RINEX paths (one per line),
    /// a single RINEX file with --lone, or a folder to scan
    pub input: PathBuf,

    /// Output folder receiving the modified files and the run log
    pub output: PathBuf,

    /// IGS site log to take header metadata from
    #[arg(short = 'l', long)]
    pub sitelog: Option<PathBuf>,

    /// Header modifications as key=value pairs (e.g. station=ABMF
    /// receiver_type='TRIMBLE NETR9'); mutually exclusive with --sitelog
    #[arg(short = 'k', long = "modification-kw", num_args = 1..)]
    pub modification_kw: Vec<String>,

    /// Four-character marker name replacing the first four characters
    /// of the filename
    #[arg(short = 'm', long)]
    pub marker: Option<String>,

    /// File mapping four-character site codes to nine-character
    /// identifiers, used when renaming with --name
    #[arg(short = '9', long = "ninecharfile")]
    pub ninecharfile: Option<PathBuf>,

    /// Path prefix to strip from each input so its subfolders are
    /// reconstructed under the output folder
    #[arg(short = 'r', long)]
    pub reconstruct: Option<PathBuf>,

    /// Compression of the output files (default: keep each file's
    /// original compression)
    #[arg(short = 'c', long, value_enum)]
    pub compression: Option<CompressionArg>,

    /// Rename files to the long naming convention
    #[arg(short = 'n', long)]
    pub name: bool,

    /// Proceed with the site log metadata even when the station in the
    /// file does not match it
    #[arg(short = 'f', long)]
    pub force: bool,

    /// When several instrumentation periods cover the observations,
    /// merge periods differing only by receiver firmware
    #[arg(short = 'i', long)]
    pub ignore: bool,

    /// Treat INPUT as a single RINEX file instead of a list file
    #[arg(short = 's', long)]
    pub lone: bool,

    /// Print the full header metadata of each file before and after
    /// modification
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Output compression choices.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionArg {
    /// gzip
    Gz,
    /// legacy Unix compress (not writable, rejected at validation)
    #[value(name = "Z", alias = "z")]
    Z,
}

impl From<CompressionArg> for CompressionKind {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Gz => CompressionKind::Gzip,
            CompressionArg::Z => CompressionKind::LegacyZ,
        }
    }
}
