//! CLI argument definitions.

use crate::config::ColorChoice;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Batch media validation harness.
///
/// Scans a directory of media files, resizes graphical files to half
/// their dimensions as WebP, sanity-checks the rest, and exits
/// non-zero when any file fails unexpectedly.
#[derive(Parser, Debug)]
#[command(
    name = "medprobe",
    version,
    about = "Batch media validation harness",
    long_about = "Scans INPUT_DIR for media files grouped by extension. Graphical files \
                  (jpg, jpeg, png, gif, webp, tiff, bmp) are resized to half their \
                  dimensions, re-encoded as WebP, and written to OUTPUT_DIR; other \
                  recognized media files get header sanity checks. Failures matching \
                  EXPECTED_FAILURES (a glob on the file name) do not fail the run."
)]
pub struct Cli {
    /// Directory to scan for media files (non-recursive)
    pub input_dir: PathBuf,

    /// Directory where resized outputs are written
    pub output_dir: PathBuf,

    /// Glob matched against file names whose failures are tolerated
    pub expected_failures: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress per-file report output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    pub color: ColorArg,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Color output choice as parsed from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    /// Always use colors
    Always,
    /// Use colors when stdout is a terminal
    Auto,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Always => Self::Always,
            ColorArg::Auto => Self::Auto,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable per-file blocks
    Text,
    /// Machine-readable run summary on stdout
    Json,
}
