//! Result and error types for Medprobe.

use thiserror::Error;

/// Result type for Medprobe operations
pub type MedprobeResult<T> = Result<T, MedprobeError>;

/// Errors that can occur while probing or transforming media files
#[derive(Debug, Error)]
pub enum MedprobeError {
    /// Input directory could not be listed (the one fatal path)
    #[error("Failed to read directory {path}: {source}")]
    ScanDir {
        /// Directory that failed to list
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Decoder could not be opened or the header could not be read
    #[error("Decode failed: {message}")]
    Decode {
        /// Error message
        message: String,
    },

    /// ffprobe invocation or output parsing failed
    #[error("ffprobe failed: {message}")]
    Probe {
        /// Error message
        message: String,
    },

    /// Resize/re-encode failed
    #[error("Transform failed: {message}")]
    Transform {
        /// Error message
        message: String,
    },

    /// The delegated encode did not finish within the configured bound
    #[error("Transform timed out after {secs}s")]
    TransformTimeout {
        /// Timeout in seconds
        secs: u64,
    },

    /// Encoded output exceeded the output byte capacity
    #[error("Encoded output of {len} bytes exceeds the {bound} byte bound")]
    OutputTooLarge {
        /// Encoded length
        len: usize,
        /// Configured bound
        bound: usize,
    },

    /// Re-decoded output dimensions do not match the requested target
    #[error("Resized dimensions ({got_width}x{got_height}) do not match specified dimensions ({want_width}x{want_height})")]
    DimensionMismatch {
        /// Actual width
        got_width: u32,
        /// Actual height
        got_height: u32,
        /// Requested width
        want_width: u32,
        /// Requested height
        want_height: u32,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MedprobeError {
    /// Create a decode error
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a probe error
    #[must_use]
    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe {
            message: message.into(),
        }
    }

    /// Create a transform error
    #[must_use]
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error() {
        let err = MedprobeError::decode("bad magic");
        assert!(err.to_string().contains("Decode failed"));
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_probe_error() {
        let err = MedprobeError::probe("ffprobe not found");
        assert!(err.to_string().contains("ffprobe"));
    }

    #[test]
    fn test_transform_error() {
        let err = MedprobeError::transform("encode rejected");
        assert!(err.to_string().contains("Transform failed"));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = MedprobeError::DimensionMismatch {
            got_width: 30,
            got_height: 20,
            want_width: 32,
            want_height: 16,
        };
        assert!(err.to_string().contains("30x20"));
        assert!(err.to_string().contains("32x16"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MedprobeError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
