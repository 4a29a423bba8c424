//! Error types for the semitone crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while transforming, decoding, encoding, or playing audio.
///
/// Every core failure is deterministic for a given input and parameter set, so
/// nothing here is retried internally. I/O boundary errors carry the offending
/// path so the caller can report something actionable.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A parameter failed validation (non-positive speed, unsupported
    /// window/hop combination, out-of-range target level).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The input signal has no samples or no channels.
    #[error("empty signal: input has no samples or no channels")]
    EmptySignal,

    /// Decoding an input file failed.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Encoding an output file failed.
    #[error("failed to encode {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    /// The playback device is unavailable or the output stream failed.
    #[error("audio device error: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = TransformError::Decode {
            path: PathBuf::from("missing.mp3"),
            reason: "no such file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing.mp3"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_display_invalid_parameter() {
        let err = TransformError::InvalidParameter("speed must be positive, got -1".to_string());
        assert!(err.to_string().contains("speed"));
    }
}
