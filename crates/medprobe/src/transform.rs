//! Transform runner for graphical files.
//!
//! Resizes a decoded image to the requested target and re-encodes it
//! as WebP. The still path runs in-process (`image` resize + libwebp
//! encode); the animated path is delegated to ffmpeg with the
//! `libwebp_anim` encoder, bounded by the configured timeout. Either
//! way the caller re-decodes the produced bytes to verify the output
//! header before anything is written.

use crate::decode::{Decoder, MediaHeader};
use crate::result::{MedprobeError, MedprobeResult};
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;
use std::time::{Duration, Instant};

/// Upper bound on encoded output, sized generously above worst-case
/// expansion.
pub const MAX_OUTPUT_BYTES: usize = 50 * 1024 * 1024;

/// Fixed WebP quality for re-encoded outputs.
pub const WEBP_QUALITY: f32 = 90.0;

/// Maximum wall-clock time for one delegated encode.
pub const ENCODE_TIMEOUT: Duration = Duration::from_secs(300);

/// Suffix appended to the still output file name.
pub const STILL_SUFFIX: &str = "_resized.webp";

/// Suffix appended to the animated output file name.
pub const ANIMATED_SUFFIX: &str = "_resized_animated.webp";

/// Immutable configuration for one transform invocation.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Apply EXIF orientation before resizing
    pub normalize_orientation: bool,
    /// WebP encode quality (0-100)
    pub quality: f32,
    /// Wall-clock bound for the delegated encode
    pub encode_timeout: Duration,
    /// Suppress animated output (still variant)
    pub disable_animation: bool,
}

impl TransformOptions {
    /// Base (still) variant targeting the given dimensions.
    #[must_use]
    pub fn still(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            normalize_orientation: true,
            quality: WEBP_QUALITY,
            encode_timeout: ENCODE_TIMEOUT,
            disable_animation: true,
        }
    }

    /// Still variant targeting half the header's dimensions.
    #[must_use]
    pub fn half_of(header: MediaHeader) -> Self {
        Self::still(header.width / 2, header.height / 2)
    }

    /// Animated variant: same configuration with animation allowed.
    #[must_use]
    pub fn animated(&self) -> Self {
        let mut options = self.clone();
        options.disable_animation = false;
        options
    }
}

/// Output file name for a source path and suffix, e.g.
/// `a.png` + `_resized.webp` -> `a.png_resized.webp`.
#[must_use]
pub fn output_name(path: &Path, suffix: &str) -> String {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{base}{suffix}")
}

/// Run the still transform: decode, resize to the exact target, encode
/// lossy WebP.
///
/// Consumes the decoder; a second attempt needs a fresh one.
///
/// # Errors
///
/// Fails on undecodable pixels, zero target dimensions, encoder
/// rejection, or output exceeding [`MAX_OUTPUT_BYTES`].
pub fn transform_still(decoder: Decoder, options: &TransformOptions) -> MedprobeResult<Vec<u8>> {
    if options.width == 0 || options.height == 0 {
        return Err(MedprobeError::transform(format!(
            "target dimensions {}x{} are degenerate",
            options.width, options.height
        )));
    }
    let img = decoder.into_image(options.normalize_orientation)?;
    let resized = img.resize_exact(options.width, options.height, FilterType::Lanczos3);
    let rgba = DynamicImage::ImageRgba8(resized.to_rgba8());
    let encoder = webp::Encoder::from_image(&rgba)
        .map_err(|e| MedprobeError::transform(format!("WebP encoder rejected frame: {e}")))?;
    let encoded = encoder.encode(options.quality);
    check_output_bound(encoded.len())?;
    Ok(encoded.to_vec())
}

/// Build the ffmpeg command line for the animated transform.
#[must_use]
pub fn build_ffmpeg_args(input: &Path, output: &Path, options: &TransformOptions) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-vf".to_string(),
        format!("scale={}:{}", options.width, options.height),
        "-c:v".to_string(),
        "libwebp_anim".to_string(),
        "-quality".to_string(),
        format!("{}", options.quality as u32),
        "-loop".to_string(),
        "0".to_string(),
        "-an".to_string(),
        "-f".to_string(),
        "webp".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

/// Run the animated transform by delegating to ffmpeg.
///
/// ffmpeg re-reads the source from disk, which doubles as the fresh
/// decode the animated pass requires. The child is killed if it runs
/// past the configured timeout.
///
/// # Errors
///
/// Fails if ffmpeg cannot be spawned, exits non-zero, times out, or
/// the output exceeds [`MAX_OUTPUT_BYTES`].
pub fn transform_animated(input: &Path, options: &TransformOptions) -> MedprobeResult<Vec<u8>> {
    if options.width == 0 || options.height == 0 {
        return Err(MedprobeError::transform(format!(
            "target dimensions {}x{} are degenerate",
            options.width, options.height
        )));
    }

    let staging = tempfile::Builder::new()
        .prefix("medprobe-")
        .suffix(".webp")
        .tempfile()?;
    let args = build_ffmpeg_args(input, staging.path(), options);

    let mut child = std::process::Command::new("ffmpeg")
        .args(&args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .map_err(|e| MedprobeError::transform(format!("Failed to execute ffmpeg: {e}")))?;

    // Drain stderr while polling so a chatty child cannot fill the
    // pipe and block until the timeout.
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            use std::io::Read;
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + options.encode_timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(MedprobeError::TransformTimeout {
                secs: options.encode_timeout.as_secs(),
            });
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    if !status.success() {
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        return Err(MedprobeError::transform(format!(
            "ffmpeg exited with {status}: {}",
            stderr.trim()
        )));
    }

    let bytes = std::fs::read(staging.path())?;
    check_output_bound(bytes.len())?;
    Ok(bytes)
}

/// Re-decode transform output and require an exact dimension match.
///
/// # Errors
///
/// Returns [`MedprobeError::DimensionMismatch`] when the produced
/// header differs from the requested target, or a decode error when
/// the bytes are not valid output at all.
pub fn verify_dimensions(bytes: &[u8], options: &TransformOptions) -> MedprobeResult<MediaHeader> {
    let decoder = Decoder::from_bytes(bytes.to_vec())?;
    let header = decoder.header();
    if header.width != options.width || header.height != options.height {
        return Err(MedprobeError::DimensionMismatch {
            got_width: header.width,
            got_height: header.height,
            want_width: options.width,
            want_height: options.height,
        });
    }
    Ok(header)
}

fn check_output_bound(len: usize) -> MedprobeResult<()> {
    if len > MAX_OUTPUT_BYTES {
        return Err(MedprobeError::OutputTooLarge {
            len,
            bound: MAX_OUTPUT_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png_decoder(width: u32, height: u32) -> Decoder {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 3) as u8, (y * 5) as u8, 160, 255])
        }));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        Decoder::from_bytes(out.into_inner()).unwrap()
    }

    #[test]
    fn test_still_options_defaults() {
        let options = TransformOptions::still(32, 16);
        assert_eq!(options.width, 32);
        assert_eq!(options.height, 16);
        assert!(options.disable_animation);
        assert!(options.normalize_orientation);
        assert!((options.quality - WEBP_QUALITY).abs() < f32::EPSILON);
        assert_eq!(options.encode_timeout, ENCODE_TIMEOUT);
    }

    #[test]
    fn test_half_of_uses_integer_division() {
        let header = MediaHeader {
            width: 65,
            height: 33,
            animated: false,
        };
        let options = TransformOptions::half_of(header);
        assert_eq!(options.width, 32);
        assert_eq!(options.height, 16);
    }

    #[test]
    fn test_animated_variant_clears_suppression() {
        let options = TransformOptions::still(32, 16);
        let animated = options.animated();
        assert!(!animated.disable_animation);
        assert_eq!(animated.width, options.width);
        assert_eq!(animated.quality, options.quality);
        // base variant untouched
        assert!(options.disable_animation);
    }

    #[test]
    fn test_output_name() {
        assert_eq!(
            output_name(Path::new("fixtures/a.png"), STILL_SUFFIX),
            "a.png_resized.webp"
        );
        assert_eq!(
            output_name(Path::new("b.gif"), ANIMATED_SUFFIX),
            "b.gif_resized_animated.webp"
        );
    }

    #[test]
    fn test_build_ffmpeg_args() {
        let options = TransformOptions::still(16, 8).animated();
        let args = build_ffmpeg_args(Path::new("in.gif"), Path::new("out.webp"), &options);
        assert!(args.contains(&"scale=16:8".to_string()));
        assert!(args.contains(&"libwebp_anim".to_string()));
        assert!(args.contains(&"90".to_string()));
        assert_eq!(args.last().unwrap(), "out.webp");
    }

    #[test]
    fn test_transform_still_halves_dimensions() {
        let decoder = png_decoder(64, 48);
        let options = TransformOptions::half_of(decoder.header());
        let bytes = transform_still(decoder, &options).unwrap();
        let header = verify_dimensions(&bytes, &options).unwrap();
        assert_eq!(header.width, 32);
        assert_eq!(header.height, 24);
    }

    #[test]
    fn test_transform_still_odd_dimensions_exact_half() {
        let decoder = png_decoder(65, 33);
        let options = TransformOptions::half_of(decoder.header());
        let bytes = transform_still(decoder, &options).unwrap();
        let header = verify_dimensions(&bytes, &options).unwrap();
        assert_eq!(header.width, 32);
        assert_eq!(header.height, 16);
    }

    #[test]
    fn test_transform_still_output_is_webp() {
        let decoder = png_decoder(16, 16);
        let options = TransformOptions::still(8, 8);
        let bytes = transform_still(decoder, &options).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_transform_still_rejects_zero_target() {
        let decoder = png_decoder(1, 1);
        let options = TransformOptions::half_of(decoder.header());
        assert!(matches!(
            transform_still(decoder, &options),
            Err(MedprobeError::Transform { .. })
        ));
    }

    #[test]
    fn test_verify_dimensions_mismatch() {
        let decoder = png_decoder(32, 32);
        let options = TransformOptions::still(16, 16);
        let bytes = transform_still(decoder, &options).unwrap();

        let wrong = TransformOptions::still(8, 8);
        assert!(matches!(
            verify_dimensions(&bytes, &wrong),
            Err(MedprobeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_dimensions_rejects_garbage() {
        let options = TransformOptions::still(8, 8);
        assert!(verify_dimensions(b"not webp", &options).is_err());
    }

    #[test]
    fn test_transform_animated_missing_input() {
        let options = TransformOptions::still(8, 8).animated();
        let result = transform_animated(Path::new("/nonexistent/anim.gif"), &options);
        assert!(result.is_err());
    }

    fn ffmpeg_available() -> bool {
        std::process::Command::new("ffmpeg")
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_transform_animated_undecodable_input_reports_stderr() {
        if !ffmpeg_available() {
            eprintln!("ffmpeg not installed, skipping");
            return;
        }
        let temp = tempfile::TempDir::new().expect("create temp dir");
        let input = temp.path().join("noise.gif");
        std::fs::write(&input, vec![0u8; 4096]).unwrap();

        let options = TransformOptions::still(8, 8).animated();
        let err = transform_animated(&input, &options).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ffmpeg exited"), "got: {message}");
    }
}
