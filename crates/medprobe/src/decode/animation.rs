//! Animated-source detection for still-image containers.
//!
//! The header probe only yields dimensions; whether a GIF/PNG/WebP
//! carries more than one frame needs a format-specific peek. Detection
//! failures are treated as "not animated" rather than errors: the full
//! decode will surface real corruption later.

use image::ImageFormat;
use std::io::Cursor;

/// Whether image bytes in the given format carry more than one frame.
pub(crate) fn detect_animation(format: ImageFormat, bytes: &[u8]) -> bool {
    match format {
        ImageFormat::Gif => gif_is_animated(bytes),
        ImageFormat::Png => png_is_animated(bytes),
        ImageFormat::WebP => webp_is_animated(bytes),
        _ => false,
    }
}

fn gif_is_animated(bytes: &[u8]) -> bool {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let Ok(mut decoder) = options.read_info(Cursor::new(bytes)) else {
        return false;
    };
    let mut frames = 0usize;
    while let Ok(Some(_)) = decoder.read_next_frame() {
        frames += 1;
        if frames > 1 {
            return true;
        }
    }
    false
}

fn png_is_animated(bytes: &[u8]) -> bool {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let Ok(reader) = decoder.read_info() else {
        return false;
    };
    matches!(reader.info().animation_control, Some(ref ac) if ac.num_frames > 1)
}

fn webp_is_animated(bytes: &[u8]) -> bool {
    image::codecs::webp::WebPDecoder::new(Cursor::new(bytes))
        .map(|decoder| decoder.has_animation())
        .unwrap_or(false)
}
