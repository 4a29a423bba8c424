#![forbid(unsafe_code)]
//! Audio pitch and speed transformation built on a phase vocoder.
//!
//! `semitone` shifts the pitch of audio in musical semitones and changes
//! its playback speed, independently of each other. Pitch shifting works by
//! time-stretching with a phase vocoder and resampling back to the original
//! length; speed changes are a pure time stretch. An optional normalization
//! pass brings the result to a target loudness (peak -1 dBFS by default).
//!
//! # Quick Start
//!
//! ```
//! use semitone::{Signal, TransformParams};
//!
//! // 1 second of 440 Hz sine at 44.1 kHz
//! let signal = Signal::from_mono(
//!     (0..44100)
//!         .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!         .collect(),
//!     44100,
//! );
//!
//! // Up a perfect fifth, 10% faster
//! let params = TransformParams::new().with_semitones(7.0).with_speed(1.1);
//! let output = semitone::process(signal, &params).unwrap();
//! ```
//!
//! # Files
//!
//! [`transform_file`] runs the whole pipeline on disk: decode (WAV, MP3,
//! AAC/M4A, FLAC, Vorbis), transform, then either write a WAV or play the
//! result through the default output device.

pub mod core;
pub mod error;
pub mod io;
pub mod transform;

use std::path::Path;

pub use core::types::{Sample, Signal, TransformParams};
pub use core::window::WindowType;
pub use error::TransformError;
pub use io::play::CancelToken;
pub use transform::normalize::{LevelMode, DEFAULT_TARGET_LEVEL};
pub use transform::pipeline::process;

use error::Result;

/// Shifts the pitch of a signal by `semitones` without changing its duration.
///
/// Convenience wrapper around [`process`] with default analysis settings.
///
/// # Errors
///
/// Returns [`TransformError::EmptySignal`] for an empty input.
pub fn pitch_shift(signal: Signal, semitones: f64) -> Result<Signal> {
    let params = TransformParams::new()
        .with_semitones(semitones)
        .with_normalize(false);
    process(signal, &params)
}

/// Changes the playback speed of a signal without changing its pitch.
///
/// `speed` > 1.0 shortens the signal, < 1.0 lengthens it.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameter`] for a non-positive speed
/// or [`TransformError::EmptySignal`] for an empty input.
pub fn time_stretch(signal: Signal, speed: f64) -> Result<Signal> {
    let params = TransformParams::new()
        .with_speed(speed)
        .with_normalize(false);
    process(signal, &params)
}

/// Decodes a file, transforms it, and writes the result as a WAV.
///
/// # Errors
///
/// Returns [`TransformError::Decode`] if the input cannot be read or
/// decoded, and [`TransformError::Encode`] if the output cannot be written
/// (including any non-`.wav` output extension).
pub fn transform_file(input: &Path, output: &Path, params: &TransformParams) -> Result<Signal> {
    let signal = io::decode::decode_file(input)?;
    let transformed = process(signal, params)?;
    io::encode::encode_file(output, &transformed)?;
    Ok(transformed)
}

/// Decodes a file, transforms it, and plays the result through the default
/// output device, blocking until playback ends or `cancel` fires.
///
/// # Errors
///
/// Returns [`TransformError::Decode`] for input failures and
/// [`TransformError::Device`] if no usable output device exists.
pub fn transform_and_play(
    input: &Path,
    params: &TransformParams,
    cancel: &CancelToken,
) -> Result<()> {
    let signal = io::decode::decode_file(input)?;
    let transformed = process(signal, params)?;
    io::play::play(&transformed, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time assertions that the public types are Send + Sync, so
    // transforms can run on worker threads and tokens can cross threads.
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<Signal>();
            assert_send_sync::<TransformParams>();
            assert_send_sync::<TransformError>();
            assert_send_sync::<CancelToken>();
        }
        let _ = check;
    };

    fn sine(freq: f32, sample_rate: u32, n: usize) -> Signal {
        Signal::from_mono(
            (0..n)
                .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
                .collect(),
            sample_rate,
        )
    }

    #[test]
    fn test_pitch_shift_preserves_length() {
        let signal = sine(440.0, 44100, 44100);
        let output = pitch_shift(signal, 7.0).unwrap();
        assert_eq!(output.data.len(), 44100);
        assert_eq!(output.sample_rate, 44100);
    }

    #[test]
    fn test_time_stretch_scales_length() {
        let signal = sine(440.0, 44100, 44100);
        let output = time_stretch(signal, 0.5).unwrap();
        assert_eq!(output.data.len(), 88200);
    }

    #[test]
    fn test_time_stretch_invalid_speed() {
        let signal = sine(440.0, 44100, 4096);
        assert!(time_stretch(signal, 0.0).is_err());
    }

    #[test]
    fn test_transform_file_missing_input() {
        let params = TransformParams::new();
        let result = transform_file(
            Path::new("/nonexistent/in.mp3"),
            Path::new("/tmp/out.wav"),
            &params,
        );
        assert!(matches!(result, Err(TransformError::Decode { .. })));
    }
}
