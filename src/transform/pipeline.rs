//! Pipeline orchestrator: pitch shift, then time stretch, then normalize.

use rayon::prelude::*;

use crate::core::types::{Signal, TransformParams};
use crate::error::{Result, TransformError};
use crate::transform::normalize;
use crate::transform::pitch::pitch_shift_channel;
use crate::transform::vocoder::PhaseVocoder;

/// Applies the full transformation to a signal.
///
/// Stage order is fixed: pitch shift first (if `semitones != 0`), then a
/// pure time stretch (if `speed != 1.0`), then normalization (if enabled).
/// Shifting before stretching keeps each stage's ratio independent and
/// avoids compounding interpolation error. Channels are processed
/// independently and in parallel, each with its own vocoder state, and are
/// reinterleaved at the end.
///
/// With all stages disabled the input is returned unchanged.
///
/// # Errors
/// Returns [`TransformError::EmptySignal`] for a zero-sample or
/// zero-channel input, or [`TransformError::InvalidParameter`] if the
/// parameters fail validation.
pub fn process(signal: Signal, params: &TransformParams) -> Result<Signal> {
    params.validate()?;
    if signal.data.is_empty() || signal.channels == 0 {
        return Err(TransformError::EmptySignal);
    }
    if params.is_identity() {
        return Ok(signal);
    }

    log::info!(
        "transforming {} frames @ {} Hz: {:+.2} semitones, speed x{:.2}, normalize {}",
        signal.num_frames(),
        signal.sample_rate,
        params.semitones,
        params.speed,
        params.normalize
    );

    let num_channels = signal.channels as usize;
    let channels = deinterleave(&signal.data, num_channels);

    let processed: Result<Vec<Vec<f32>>> = channels
        .par_iter()
        .map(|channel| process_channel(channel, params))
        .collect();

    let mut data = interleave(&processed?);

    if params.normalize {
        let gain = normalize::normalize(&mut data, params.level_mode, params.target_level);
        log::debug!("normalization gain factor {gain:.4}");
    }

    Signal::new(data, signal.channels, signal.sample_rate)
}

/// Runs the pitch and stretch stages on one channel.
fn process_channel(channel: &[f32], params: &TransformParams) -> Result<Vec<f32>> {
    let mut samples = if params.semitones != 0.0 {
        pitch_shift_channel(
            channel,
            params.semitones,
            params.window_len,
            params.hop(),
            params.window_type,
        )?
    } else {
        channel.to_vec()
    };

    if params.speed != 1.0 {
        // speed > 1 shortens the output, so the synthesis hop scales by
        // the inverse of the speed factor.
        let mut vocoder = PhaseVocoder::new(
            params.window_len,
            params.hop(),
            params.window_type,
            1.0 / params.speed,
        )?;
        samples = vocoder.process(&samples);
    }

    Ok(samples)
}

/// Splits interleaved samples into per-channel vectors.
pub fn deinterleave(input: &[f32], num_channels: usize) -> Vec<Vec<f32>> {
    (0..num_channels)
        .map(|ch| {
            input
                .iter()
                .skip(ch)
                .step_by(num_channels)
                .copied()
                .collect()
        })
        .collect()
}

/// Interleaves per-channel vectors back into a single buffer, truncating
/// to the shortest channel.
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let min_len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    (0..min_len)
        .flat_map(|i| channels.iter().map(move |ch| ch[i]))
        .collect()
}
