//! Library surface of the medprobe CLI.
//!
//! The binary is a thin shell over [`runner::run_harness`]; everything
//! else lives here so integration tests can exercise argument parsing
//! and configuration without spawning a process.

#![warn(missing_docs)]

pub mod commands;
pub mod config;
pub mod error;
pub mod runner;

pub use commands::{Cli, ColorArg, OutputFormat};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use runner::run_harness;
