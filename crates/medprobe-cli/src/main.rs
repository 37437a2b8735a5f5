//! Medprobe CLI: batch media validation harness
//!
//! ## Usage
//!
//! ```bash
//! medprobe <input_dir> <output_dir>             # Validate all files
//! medprobe <input_dir> <output_dir> "broken.*"  # Tolerate known-bad files
//! medprobe <input_dir> <output_dir> --format json
//! ```

use clap::Parser;
use medprobe_cli::{Cli, CliConfig, ColorChoice, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);

    match medprobe_cli::run_harness(&config, &cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Route library diagnostics to stderr; RUST_LOG overrides the
/// verbosity-derived default.
fn init_tracing(config: &CliConfig) {
    let default_directive = match config.verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::Debug => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
