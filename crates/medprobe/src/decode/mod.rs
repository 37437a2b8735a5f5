//! Decoder facade over the external media collaborators.
//!
//! Still images are resolved in-process through the `image` crate
//! family; everything else (video/audio containers) is probed by
//! shelling out to ffprobe. Either way the caller sees one single-use
//! handle exposing a header, a duration, and a format description.

mod animation;
pub mod probe;

pub use probe::ContainerProbe;

use crate::result::{MedprobeError, MedprobeResult};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Duration reported for still images, which have no time axis.
/// Negative by convention; callers treat it as informational.
pub const STILL_DURATION_SECS: f64 = -1.0;

/// Minimal decoded metadata, readable without decoding pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaHeader {
    /// Width in pixels (0 for audio-only containers)
    pub width: u32,
    /// Height in pixels (0 for audio-only containers)
    pub height: u32,
    /// Whether the source carries more than one frame
    pub animated: bool,
}

enum DecoderKind {
    Still {
        format: ImageFormat,
        width: u32,
        height: u32,
        animated: bool,
    },
    Container(ContainerProbe),
}

/// Single-use decoder handle bound to one file's bytes.
///
/// A decoder is good for one transform attempt: the transform path
/// consumes it via [`Decoder::into_image`], so a second attempt has to
/// acquire a fresh instance.
pub struct Decoder {
    bytes: Vec<u8>,
    kind: DecoderKind,
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("bytes", &self.bytes.len())
            .field("description", &self.description())
            .finish()
    }
}

impl Decoder {
    /// Open a decoder for an on-disk file.
    ///
    /// Image data is recognized from the bytes themselves; anything
    /// else is handed to ffprobe by path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or neither collaborator
    /// recognizes its contents.
    pub fn open(path: &Path) -> MedprobeResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| MedprobeError::decode(format!("Failed to read {}: {e}", path.display())))?;
        if let Ok(format) = image::guess_format(&bytes) {
            return Self::still_from_bytes(bytes, format);
        }
        let container = probe::probe_file(path)?;
        Ok(Self {
            bytes,
            kind: DecoderKind::Container(container),
        })
    }

    /// Open a decoder over raw image bytes.
    ///
    /// Used to verify transform output; only still-image data is
    /// accepted here.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not a recognized image format or the
    /// header cannot be read.
    pub fn from_bytes(bytes: Vec<u8>) -> MedprobeResult<Self> {
        let format = image::guess_format(&bytes)
            .map_err(|e| MedprobeError::decode(format!("Unrecognized image data: {e}")))?;
        Self::still_from_bytes(bytes, format)
    }

    fn still_from_bytes(bytes: Vec<u8>, format: ImageFormat) -> MedprobeResult<Self> {
        let (width, height) = ImageReader::with_format(Cursor::new(bytes.as_slice()), format)
            .into_dimensions()
            .map_err(|e| MedprobeError::decode(format!("Failed to read image header: {e}")))?;
        let animated = animation::detect_animation(format, &bytes);
        Ok(Self {
            bytes,
            kind: DecoderKind::Still {
                format,
                width,
                height,
                animated,
            },
        })
    }

    /// The decoded header.
    #[must_use]
    pub fn header(&self) -> MediaHeader {
        match &self.kind {
            DecoderKind::Still {
                width,
                height,
                animated,
                ..
            } => MediaHeader {
                width: *width,
                height: *height,
                animated: *animated,
            },
            DecoderKind::Container(probe) => MediaHeader {
                width: probe.width,
                height: probe.height,
                animated: false,
            },
        }
    }

    /// Overall duration in seconds. Negative for still images.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        match &self.kind {
            DecoderKind::Still { .. } => STILL_DURATION_SECS,
            DecoderKind::Container(probe) => probe.duration_secs,
        }
    }

    /// Human-readable format description.
    #[must_use]
    pub fn description(&self) -> String {
        match &self.kind {
            DecoderKind::Still { format, .. } => format.to_mime_type().to_string(),
            DecoderKind::Container(probe) => {
                format!("{} ({})", probe.format_name, probe.codec)
            }
        }
    }

    /// Whether the source carries more than one frame.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.header().animated
    }

    /// Decode the pixel data, consuming the handle.
    ///
    /// When `normalize_orientation` is set, the EXIF orientation (if
    /// any) is applied so the output is upright.
    ///
    /// # Errors
    ///
    /// Fails for container decoders and for image data whose pixels
    /// cannot be decoded.
    pub fn into_image(self, normalize_orientation: bool) -> MedprobeResult<DynamicImage> {
        if matches!(self.kind, DecoderKind::Container(_)) {
            return Err(MedprobeError::decode(
                "container decoders cannot produce image frames",
            ));
        }
        let mut decoder = ImageReader::new(Cursor::new(self.bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| MedprobeError::decode(format!("Failed to sniff image format: {e}")))?
            .into_decoder()
            .map_err(|e| MedprobeError::decode(format!("Failed to open image decoder: {e}")))?;
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        let mut img = DynamicImage::from_decoder(decoder)
            .map_err(|e| MedprobeError::decode(format!("Failed to decode image: {e}")))?;
        if normalize_orientation {
            img.apply_orientation(orientation);
        }
        Ok(img)
    }
}
