//! Interpolated resampling to a target length.
//!
//! The pitch shifter uses this to restore the original duration after a
//! phase-vocoder stretch; the resampling factor is what actually moves the
//! pitch. Cubic Hermite is the default quality; windowed-sinc is available
//! for callers who want a sharper cutoff at higher cost.

use crate::core::window::bessel_i0;

/// Interpolation quality for [`resample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// Two-point linear interpolation.
    Linear,
    /// Four-point cubic Hermite interpolation.
    Cubic,
    /// Kaiser-windowed sinc interpolation (8 lobes).
    Sinc,
}

/// Sinc kernel half-width in zero crossings.
const SINC_LOBES: usize = 8;

/// Kaiser beta for the sinc kernel; ~60 dB stopband attenuation.
const SINC_BETA: f64 = 6.0;

/// Resamples a mono channel to `output_len` samples.
pub fn resample(input: &[f32], output_len: usize, quality: Quality) -> Vec<f32> {
    if input.is_empty() || output_len == 0 {
        return vec![];
    }
    if input.len() == 1 {
        return vec![input[0]; output_len];
    }
    match quality {
        Quality::Linear => resample_linear(input, output_len),
        Quality::Cubic => {
            if input.len() < 4 {
                resample_linear(input, output_len)
            } else {
                resample_cubic(input, output_len)
            }
        }
        Quality::Sinc => {
            if input.len() < 2 * SINC_LOBES {
                resample(input, output_len, Quality::Cubic)
            } else {
                resample_sinc(input, output_len)
            }
        }
    }
}

/// Source position for output index `i` when mapping endpoints to endpoints.
#[inline]
fn step(input_len: usize, output_len: usize) -> f64 {
    (input_len - 1) as f64 / (output_len.max(2) - 1) as f64
}

fn resample_linear(input: &[f32], output_len: usize) -> Vec<f32> {
    let step = step(input.len(), output_len);
    (0..output_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;
            if idx + 1 < input.len() {
                input[idx] * (1.0 - frac) + input[idx + 1] * frac
            } else {
                input[input.len() - 1]
            }
        })
        .collect()
}

fn resample_cubic(input: &[f32], output_len: usize) -> Vec<f32> {
    let step = step(input.len(), output_len);
    let last = input.len() - 1;
    (0..output_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;

            let s0 = input[idx.saturating_sub(1)];
            let s1 = input[idx];
            let s2 = input[(idx + 1).min(last)];
            let s3 = input[(idx + 2).min(last)];

            // Hermite basis
            let c0 = s1;
            let c1 = 0.5 * (s2 - s0);
            let c2 = s0 - 2.5 * s1 + 2.0 * s2 - 0.5 * s3;
            let c3 = 0.5 * (s3 - s0) + 1.5 * (s1 - s2);

            ((c3 * frac + c2) * frac + c1) * frac + c0
        })
        .collect()
}

fn resample_sinc(input: &[f32], output_len: usize) -> Vec<f32> {
    let step = step(input.len(), output_len);
    let kernel_denom = bessel_i0(SINC_BETA);
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let pos = i as f64 * step;
        let center = pos as isize;
        let frac = pos - center as f64;

        let mut sample = 0.0f64;
        let mut weight_sum = 0.0f64;

        for j in (1 - SINC_LOBES as isize)..=(SINC_LOBES as isize) {
            let idx = center + j;
            if idx < 0 || idx >= input.len() as isize {
                continue;
            }

            let x = frac - j as f64;
            let sinc_val = if x.abs() < 1e-10 {
                1.0
            } else {
                let pi_x = std::f64::consts::PI * x;
                pi_x.sin() / pi_x
            };

            let t = (j as f64 - frac) / SINC_LOBES as f64;
            let kaiser = if t.abs() <= 1.0 {
                bessel_i0(SINC_BETA * (1.0 - t * t).max(0.0).sqrt()) / kernel_denom
            } else {
                0.0
            };

            let w = sinc_val * kaiser;
            sample += input[idx as usize] as f64 * w;
            weight_sum += w;
        }

        // Normalize to preserve DC gain near the edges.
        if weight_sum.abs() > 1e-10 {
            sample /= weight_sum;
        }
        output.push(sample as f32);
    }

    output
}
