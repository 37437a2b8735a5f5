//! Medprobe: batch media validation harness.
//!
//! Decodes a directory of media fixtures through external collaborators
//! (the `image` crate family for stills, ffprobe/ffmpeg for containers),
//! checks basic invariants (dimensions, duration, animation flag),
//! re-encodes graphical inputs at half size, and reports pass/fail per
//! file with expected-failure glob support.
//!
//! The library carries the harness logic; the `medprobe-cli` crate owns
//! argument parsing and report rendering.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod classify;
pub mod decode;
pub mod expect;
pub mod harness;
pub mod inspect;
mod result;
pub mod transform;

pub use classify::{is_graphical, scan_dir, FileGroups};
pub use decode::{Decoder, MediaHeader};
pub use expect::ExpectedFailures;
pub use harness::{process_graphical, process_non_graphical, FileOutcome, RunSummary};
pub use inspect::{inspect_file, InspectReport};
pub use result::{MedprobeError, MedprobeResult};
pub use transform::{TransformOptions, ENCODE_TIMEOUT, MAX_OUTPUT_BYTES, WEBP_QUALITY};
