//! Pitch shifting: a phase-vocoder stretch composed with plain resampling.
//!
//! Stretching by `r = 2^(semitones/12)` lengthens the signal without moving
//! its pitch; resampling the result back to the original length is what
//! shifts the pitch, since perceived pitch is inversely tied to playback
//! rate. The two factors cancel in duration, so the output length equals
//! the input length exactly.

use crate::core::resample::{resample, Quality};
use crate::core::window::WindowType;
use crate::error::Result;
use crate::transform::vocoder::PhaseVocoder;

/// Converts a semitone shift to its frequency ratio: `2^(semitones/12)`.
#[inline]
pub fn semitone_ratio(semitones: f64) -> f64 {
    2f64.powf(semitones / 12.0)
}

/// Shifts one channel by `semitones`, preserving its length.
///
/// `semitones` may be fractional and negative. Zero is an identity bypass.
/// Shifts beyond about two octaves work but degrade audibly.
pub fn pitch_shift_channel(
    input: &[f32],
    semitones: f64,
    window_len: usize,
    hop: usize,
    window_type: WindowType,
) -> Result<Vec<f32>> {
    if semitones == 0.0 {
        return Ok(input.to_vec());
    }

    let ratio = semitone_ratio(semitones);
    let mut vocoder = PhaseVocoder::new(window_len, hop, window_type, ratio)?;
    let stretched = vocoder.process(input);
    if stretched.is_empty() {
        return Ok(vec![]);
    }

    // Resampling by 1/ratio restores the duration and moves the pitch.
    Ok(resample(&stretched, input.len(), Quality::Cubic))
}
