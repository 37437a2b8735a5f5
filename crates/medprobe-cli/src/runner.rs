//! Harness driver.
//!
//! Scans the input directory, routes each file to the graphical or
//! inspection path, prints the per-file report, and turns the run
//! summary into the process verdict.

use crate::commands::{Cli, OutputFormat};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use medprobe::{
    is_graphical, process_graphical, process_non_graphical, scan_dir, ExpectedFailures, RunSummary,
};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Run the full validation pass over the input directory.
///
/// # Errors
///
/// Returns an error when the input directory is missing or unreadable,
/// the output directory cannot be created, or any file fails a check
/// without being covered by the expected-failures pattern.
pub fn run_harness(config: &CliConfig, cli: &Cli) -> CliResult<()> {
    if !cli.input_dir.is_dir() {
        return Err(CliError::invalid_argument(format!(
            "input directory {} does not exist",
            cli.input_dir.display()
        )));
    }
    std::fs::create_dir_all(&cli.output_dir)?;

    let expected = ExpectedFailures::new(cli.expected_failures.as_deref());
    let groups = scan_dir(&cli.input_dir)?;

    let text_output = cli.format == OutputFormat::Text && !config.verbosity.is_quiet();
    let mut summary = RunSummary::default();

    for (ext, files) in &groups {
        if text_output {
            if ext.is_empty() {
                println!("\nProcessing files without extension:");
            } else {
                println!("\nProcessing {ext} files:");
            }
        }

        for path in files {
            let graphical = is_graphical(ext);
            if text_output {
                if graphical {
                    println!("Testing graphical file: {}", path.display());
                } else {
                    println!("Inspecting file: {}", path.display());
                }
            }

            let outcome = if graphical {
                process_graphical(path, &cli.output_dir, &expected)
            } else {
                process_non_graphical(path, &expected)
            };

            if text_output {
                for line in &outcome.lines {
                    println!("  {line}");
                }
            }
            summary.push(outcome);
        }
    }

    report_summary(config, cli, &summary);

    if summary.all_passed() {
        Ok(())
    } else {
        Err(CliError::test_execution(format!(
            "{} unexpected failure(s)",
            summary.unexpected_failures()
        )))
    }
}

/// Print the run verdict in the requested format.
fn report_summary(config: &CliConfig, cli: &Cli, summary: &RunSummary) {
    match cli.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "total": summary.total(),
                "unexpected_failures": summary.unexpected_failures(),
                "passed": summary.all_passed(),
                "files": summary.outcomes,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            if config.verbosity.is_quiet() {
                return;
            }
            let color = config.color.should_color();
            if summary.all_passed() {
                if color {
                    println!("\n{GREEN}All tests passed successfully.{RESET}");
                } else {
                    println!("\nAll tests passed successfully.");
                }
            } else if color {
                println!("\n{RED}Some tests or transformations failed.{RESET}");
            } else {
                println!("\nSome tests or transformations failed.");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{ColorChoice, Verbosity};
    use clap::Parser;
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    fn quiet_config() -> CliConfig {
        CliConfig::new()
            .with_verbosity(Verbosity::Quiet)
            .with_color(ColorChoice::Never)
    }

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["medprobe"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    fn write_png(dir: &Path, name: &str) {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            32,
            32,
            image::Rgba([40, 80, 120, 255]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        std::fs::write(dir.join(name), out.into_inner()).unwrap();
    }

    #[test]
    fn test_missing_input_dir_is_invalid_argument() {
        let output = TempDir::new().expect("create temp dir");
        let cli = cli(&["/nonexistent/in", output.path().to_str().unwrap()]);
        let result = run_harness(&quiet_config(), &cli);
        assert!(matches!(result, Err(CliError::InvalidArgument { .. })));
    }

    #[test]
    fn test_empty_input_dir_passes() {
        let input = TempDir::new().expect("create temp dir");
        let output = TempDir::new().expect("create temp dir");
        let cli = cli(&[
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
        ]);
        assert!(run_harness(&quiet_config(), &cli).is_ok());
    }

    #[test]
    fn test_png_produces_resized_output() {
        let input = TempDir::new().expect("create temp dir");
        let output = TempDir::new().expect("create temp dir");
        write_png(input.path(), "a.png");

        let cli = cli(&[
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
        ]);
        assert!(run_harness(&quiet_config(), &cli).is_ok());
        assert!(output.path().join("a.png_resized.webp").is_file());
    }

    #[test]
    fn test_output_dir_is_created() {
        let input = TempDir::new().expect("create temp dir");
        let parent = TempDir::new().expect("create temp dir");
        let out_path = parent.path().join("nested").join("out");
        write_png(input.path(), "a.png");

        let cli = cli(&[
            input.path().to_str().unwrap(),
            out_path.to_str().unwrap(),
        ]);
        assert!(run_harness(&quiet_config(), &cli).is_ok());
        assert!(out_path.join("a.png_resized.webp").is_file());
    }

    #[test]
    fn test_garbage_video_fails_run() {
        let input = TempDir::new().expect("create temp dir");
        let output = TempDir::new().expect("create temp dir");
        std::fs::write(input.path().join("broken.mp4"), b"not a container").unwrap();

        let cli = cli(&[
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
        ]);
        let result = run_harness(&quiet_config(), &cli);
        assert!(matches!(result, Err(CliError::TestExecution { .. })));
    }

    #[test]
    fn test_expected_failure_pattern_tolerates() {
        let input = TempDir::new().expect("create temp dir");
        let output = TempDir::new().expect("create temp dir");
        std::fs::write(input.path().join("broken.mp4"), b"not a container").unwrap();

        let cli = cli(&[
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
            "broken.*",
        ]);
        assert!(run_harness(&quiet_config(), &cli).is_ok());
    }

    #[test]
    fn test_invalid_pattern_matches_nothing() {
        let input = TempDir::new().expect("create temp dir");
        let output = TempDir::new().expect("create temp dir");
        std::fs::write(input.path().join("broken.mp4"), b"not a container").unwrap();

        let cli = cli(&[
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
            "[invalid",
        ]);
        let result = run_harness(&quiet_config(), &cli);
        assert!(matches!(result, Err(CliError::TestExecution { .. })));
    }
}
