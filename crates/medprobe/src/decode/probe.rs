//! Container probing via ffprobe.
//!
//! Extracts container metadata (format, codec, dimensions, duration)
//! by shelling out to ffprobe with JSON output. ffprobe is the opaque
//! collaborator here; this module only builds its command line and
//! reads its answer.

use crate::result::{MedprobeError, MedprobeResult};
use std::path::Path;

/// Metadata for a probed container (video or audio).
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerProbe {
    /// Container format name as reported by ffprobe (e.g. "matroska,webm")
    pub format_name: String,
    /// Codec of the primary stream
    pub codec: String,
    /// Width of the first video stream, 0 for audio-only files
    pub width: u32,
    /// Height of the first video stream, 0 for audio-only files
    pub height: u32,
    /// Overall duration in seconds
    pub duration_secs: f64,
    /// Whether the container carries a video stream
    pub has_video: bool,
}

/// Build ffprobe command arguments for JSON output.
#[must_use]
pub fn build_ffprobe_args(path: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "quiet".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_format".to_string(),
        "-show_streams".to_string(),
        path.to_string_lossy().to_string(),
    ]
}

/// Probe a media file and extract container metadata.
///
/// # Errors
///
/// Returns [`MedprobeError::Probe`] if ffprobe is not found, exits
/// non-zero (unrecognized input), or produces unparseable output.
pub fn probe_file(path: &Path) -> MedprobeResult<ContainerProbe> {
    let args = build_ffprobe_args(path);

    let output = std::process::Command::new("ffprobe")
        .args(&args)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .output()
        .map_err(|e| MedprobeError::probe(format!("Failed to execute ffprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MedprobeError::probe(format!(
            "ffprobe exited with {}: {stderr}",
            output.status
        )));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    parse_ffprobe_json(&json_str)
}

/// Parse ffprobe JSON output into a [`ContainerProbe`].
///
/// # Errors
///
/// Returns [`MedprobeError::Probe`] when the JSON is malformed or
/// carries no decodable streams.
pub fn parse_ffprobe_json(json: &str) -> MedprobeResult<ContainerProbe> {
    let parsed: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| MedprobeError::probe(format!("Failed to parse ffprobe JSON: {e}")))?;

    let streams = parsed
        .get("streams")
        .and_then(|s| s.as_array())
        .ok_or_else(|| MedprobeError::probe("ffprobe output missing 'streams' array"))?;

    let video_stream = streams
        .iter()
        .find(|s| s.get("codec_type").and_then(|t| t.as_str()) == Some("video"));
    let audio_stream = streams
        .iter()
        .find(|s| s.get("codec_type").and_then(|t| t.as_str()) == Some("audio"));

    let primary = video_stream
        .or(audio_stream)
        .ok_or_else(|| MedprobeError::probe("No decodable streams found"))?;

    let codec = primary
        .get("codec_name")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let width = video_stream
        .and_then(|s| s.get("width"))
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let height = video_stream
        .and_then(|s| s.get("height"))
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    // Stream duration first, format duration as the fallback; some
    // containers only report one of the two.
    let duration_secs = primary
        .get("duration")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| {
            parsed
                .get("format")
                .and_then(|f| f.get("duration"))
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<f64>().ok())
        })
        .unwrap_or(0.0);

    let format_name = parsed
        .get("format")
        .and_then(|f| f.get("format_name"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(ContainerProbe {
        format_name,
        codec,
        width,
        height,
        duration_secs,
        has_video: video_stream.is_some(),
    })
}
