//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::f32::consts::PI;

use semitone::Signal;

/// Generates `n` samples of a mono sine at `freq` Hz.
pub fn sine(freq: f32, sample_rate: u32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Wraps a sine in a mono [`Signal`].
pub fn sine_signal(freq: f32, sample_rate: u32, n: usize) -> Signal {
    Signal::from_mono(sine(freq, sample_rate, n), sample_rate)
}

/// Root-mean-square level of a buffer.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Magnitude of the signal's correlation with a complex exponential at
/// `freq` Hz, i.e. a single-bin DFT evaluated off-grid.
fn tone_magnitude(samples: &[f32], sample_rate: u32, freq: f32) -> f32 {
    let omega = 2.0 * PI * freq / sample_rate as f32;
    let (mut re, mut im) = (0.0f32, 0.0f32);
    for (i, &s) in samples.iter().enumerate() {
        let phase = omega * i as f32;
        re += s * phase.cos();
        im += s * phase.sin();
    }
    (re * re + im * im).sqrt()
}

/// Finds the strongest frequency in `[lo, hi]` Hz, scanning in 1 Hz steps.
///
/// Coarse but assumption-free: it does not depend on FFT bin alignment, so
/// it works on output whose length is not a power of two.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32, lo: f32, hi: f32) -> f32 {
    let mut best_freq = lo;
    let mut best_mag = 0.0f32;
    let mut freq = lo;
    while freq <= hi {
        let mag = tone_magnitude(samples, sample_rate, freq);
        if mag > best_mag {
            best_mag = mag;
            best_freq = freq;
        }
        freq += 1.0;
    }
    best_freq
}
