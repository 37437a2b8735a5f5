//! Per-file orchestration and run aggregation.
//!
//! Graphical files go through the transform pipeline (still output,
//! plus an animated output for animated sources); everything else is
//! inspected. Each file yields one [`FileOutcome`]; the driver folds
//! outcomes into a [`RunSummary`] and reads the verdict off it at the
//! end. Failures never abort processing of other files.

use crate::decode::Decoder;
use crate::expect::ExpectedFailures;
use crate::inspect::inspect_file;
use crate::transform::{
    output_name, transform_animated, transform_still, verify_dimensions, TransformOptions,
    ANIMATED_SUFFIX, STILL_SUFFIX,
};
use serde::Serialize;
use std::path::Path;

/// Result of processing one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// Processed file path
    pub path: String,
    /// Whether any check or transform failed
    pub failed: bool,
    /// Whether a failure was pre-declared acceptable
    pub expected_failure: bool,
    /// Report lines for the human-readable block
    pub lines: Vec<String>,
}

impl FileOutcome {
    /// Whether this outcome counts toward the run-level failure.
    #[must_use]
    pub fn counts_against_run(&self) -> bool {
        self.failed && !self.expected_failure
    }
}

/// Aggregate of all per-file outcomes for one run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    /// Outcomes in processing order
    pub outcomes: Vec<FileOutcome>,
}

impl RunSummary {
    /// Record one outcome.
    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of files processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of failures not covered by the expected-failure pattern.
    #[must_use]
    pub fn unexpected_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.counts_against_run())
            .count()
    }

    /// Whether the run as a whole passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.unexpected_failures() == 0
    }
}

/// Accumulates lines and the failure state for one file.
struct ReportBuilder<'a> {
    path: &'a Path,
    lines: Vec<String>,
    failed: bool,
}

impl<'a> ReportBuilder<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            lines: Vec::new(),
            failed: false,
        }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}: {message}", self.path.display());
        self.lines.push(format!("Failure: {message}"));
        self.failed = true;
    }

    fn finish(mut self, expected: &ExpectedFailures) -> FileOutcome {
        let expected_failure = self.failed && expected.matches(self.path);
        if expected_failure {
            self.lines
                .push("Note: This failure was expected".to_string());
        }
        FileOutcome {
            path: self.path.display().to_string(),
            failed: self.failed,
            expected_failure,
            lines: self.lines,
        }
    }
}

/// Process a graphical file: decode, resize to half dimensions, write
/// the still output, and for animated sources also the animated one.
pub fn process_graphical(
    path: &Path,
    out_dir: &Path,
    expected: &ExpectedFailures,
) -> FileOutcome {
    let mut report = ReportBuilder::new(path);

    match Decoder::open(path) {
        Err(err) => report.fail(format!("Unable to open a decoder: {err}")),
        Ok(decoder) => {
            let header = decoder.header();
            report.line(format!("Format: {}", decoder.description()));
            report.line(format!("Dimensions: {} x {}", header.width, header.height));
            report.line(format!("Animated: {}", header.animated));

            let options = TransformOptions::half_of(header);

            // Still pass consumes the decoder.
            match transform_still(decoder, &options) {
                Err(err) => report.fail(format!("Still transform failed: {err}")),
                Ok(bytes) => write_verified(&mut report, &bytes, &options, out_dir, STILL_SUFFIX),
            }

            if header.animated {
                // The animated pass needs a fresh decode of the
                // source; ffmpeg re-reads it from disk.
                let animated_options = options.animated();
                match transform_animated(path, &animated_options) {
                    Err(err) => report.fail(format!("Animated transform failed: {err}")),
                    Ok(bytes) => write_verified(
                        &mut report,
                        &bytes,
                        &animated_options,
                        out_dir,
                        ANIMATED_SUFFIX,
                    ),
                }
            }
        }
    }

    let mut outcome = report.finish(expected);
    if !outcome.failed {
        outcome.lines.push("Test completed successfully".to_string());
    }
    outcome
}

/// Verify transform output dimensions and write the bytes out.
///
/// Nothing is written when verification fails, so the output directory
/// never holds an output that contradicts its request.
fn write_verified(
    report: &mut ReportBuilder<'_>,
    bytes: &[u8],
    options: &TransformOptions,
    out_dir: &Path,
    suffix: &str,
) {
    match verify_dimensions(bytes, options) {
        Err(err) => {
            report.fail(format!("Output verification failed: {err}"));
            return;
        }
        Ok(header) => {
            report.line(format!(
                "Resized dimensions match: {}x{}",
                header.width, header.height
            ));
        }
    }

    let out_path = out_dir.join(output_name(report.path, suffix));
    match std::fs::write(&out_path, bytes) {
        Ok(()) => report.line(format!("Resized and saved to: {}", out_path.display())),
        Err(err) => report.fail(format!("Failed to write {}: {err}", out_path.display())),
    }
}

/// Process a non-graphical file through the inspector.
///
/// The block always closes with "Inspection completed", pass or fail;
/// the success trailer belongs to the graphical path only.
pub fn process_non_graphical(path: &Path, expected: &ExpectedFailures) -> FileOutcome {
    let inspection = inspect_file(path);
    let mut report = ReportBuilder::new(path);
    report.failed = inspection.failed();
    report.lines = inspection.lines;
    for failure in &inspection.failures {
        report.lines.push(format!("Failure: {failure}"));
    }
    let mut outcome = report.finish(expected);
    outcome.lines.push("Inspection completed".to_string());
    outcome
}
