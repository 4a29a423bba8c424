//! Phase vocoder: resynthesizes spectral frames at a new hop spacing,
//! changing duration while preserving perceived pitch.

use std::f32::consts::PI;

use rustfft::num_complex::Complex;

use crate::core::frame::{FrameAnalyzer, SpectralFrame};
use crate::core::window::WindowType;
use crate::error::{Result, TransformError};

const TWO_PI: f32 = 2.0 * PI;

/// Minimum window-overlap sum (as a fraction of its maximum) kept during
/// overlap-add normalization, so low-overlap edge regions are not amplified.
const WINDOW_SUM_FLOOR_RATIO: f32 = 0.1;

/// One phase-vocoder instance per channel. Owns the per-bin phase
/// accumulator, so concurrent channels share no mutable state.
pub struct PhaseVocoder {
    analyzer: FrameAnalyzer,
    hop_synthesis: usize,
    /// Running synthesis phase per bin, carried across frames.
    phase_accum: Vec<f32>,
    /// Analysis phase of the previous frame per bin.
    prev_phase: Vec<f32>,
    /// Expected phase advance per bin over one analysis hop.
    expected_advance: Vec<f32>,
    /// Reusable synthesis spectrum.
    scratch: Vec<Complex<f32>>,
}

impl PhaseVocoder {
    /// Creates a vocoder that resynthesizes at `stretch_ratio` times the
    /// analysis hop: ratio > 1 lengthens the signal, < 1 shortens it.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidParameter`] for a non-positive or
    /// non-finite ratio, or for an unsupported window/hop combination.
    pub fn new(
        window_len: usize,
        hop: usize,
        window_type: WindowType,
        stretch_ratio: f64,
    ) -> Result<Self> {
        if !stretch_ratio.is_finite() || stretch_ratio <= 0.0 {
            return Err(TransformError::InvalidParameter(format!(
                "stretch ratio must be positive and finite, got {stretch_ratio}"
            )));
        }
        let analyzer = FrameAnalyzer::new(window_len, hop, window_type)?;
        let hop_synthesis = ((hop as f64 * stretch_ratio).round() as usize).max(1);
        let num_bins = analyzer.num_bins();
        let expected_advance = (0..num_bins)
            .map(|bin| TWO_PI * bin as f32 * hop as f32 / window_len as f32)
            .collect();
        Ok(Self {
            analyzer,
            hop_synthesis,
            phase_accum: vec![0.0; num_bins],
            prev_phase: vec![0.0; num_bins],
            expected_advance,
            scratch: vec![Complex::new(0.0, 0.0); num_bins],
        })
    }

    /// The analysis hop size `Ha`.
    #[inline]
    pub fn hop_analysis(&self) -> usize {
        self.analyzer.hop()
    }

    /// The synthesis hop size `Hs`.
    #[inline]
    pub fn hop_synthesis(&self) -> usize {
        self.hop_synthesis
    }

    /// Output length for a given input length: `input * Hs / Ha`, rounded.
    pub fn output_len(&self, input_len: usize) -> usize {
        (input_len as f64 * self.hop_synthesis as f64 / self.analyzer.hop() as f64).round()
            as usize
    }

    /// Time-stretches one channel.
    ///
    /// Analysis frames are taken every `Ha` samples; for each bin the phase
    /// delta from the previous frame is unwrapped against the bin's expected
    /// advance to estimate its true frequency, and a synthesis phase is
    /// accumulated at the `Hs` spacing. Each output frame keeps the analysis
    /// magnitude, and overlap-add with squared-window-sum normalization
    /// removes the amplitude ripple of the new overlap ratio.
    ///
    /// The output is `output_len(input.len())` samples, accurate to within
    /// one hop. Near-silent frames still advance the accumulator so phase
    /// stays continuous when energy resumes.
    pub fn process(&mut self, input: &[f32]) -> Vec<f32> {
        if input.is_empty() {
            return vec![];
        }

        let window_len = self.analyzer.window_len();
        let num_bins = self.analyzer.num_bins();
        let hop_ratio = self.hop_synthesis as f32 / self.analyzer.hop() as f32;

        let num_frames = self.analyzer.num_frames(input.len());
        let alloc_len = (num_frames - 1) * self.hop_synthesis + window_len;
        let target_len = self.output_len(input.len());

        let mut output = vec![0.0f32; alloc_len.max(target_len)];
        let mut window_sum = vec![0.0f32; output.len()];

        self.reset();

        let mut synthesis_pos = 0usize;
        let mut first_frame = true;
        let frames: Vec<_> = self.analyzer.frames(input).collect();
        for frame in &frames {
            let spectrum = self.analyzer.forward(frame);

            let mut bins = std::mem::take(&mut self.scratch);
            for (bin, slot) in bins.iter_mut().enumerate() {
                let magnitude = spectrum.magnitude(bin);
                let phase = spectrum.phase(bin);

                if first_frame {
                    // No prior frame: synthesis phase starts at the
                    // analysis phase.
                    self.phase_accum[bin] = phase;
                } else {
                    let expected = self.expected_advance[bin];
                    let deviation = wrap_phase(phase - self.prev_phase[bin] - expected);
                    let true_advance = expected + deviation;
                    self.phase_accum[bin] += true_advance * hop_ratio;
                }
                self.prev_phase[bin] = phase;

                *slot = Complex::from_polar(magnitude, self.phase_accum[bin]);
            }

            let synth = SpectralFrame {
                start: frame.start,
                bins,
            };
            let segment = self.analyzer.inverse(&synth);
            self.scratch = synth.bins;

            let window = self.analyzer.window();
            for (i, &sample) in segment.iter().enumerate() {
                let out_idx = synthesis_pos + i;
                if out_idx >= output.len() {
                    break;
                }
                output[out_idx] += sample;
                window_sum[out_idx] += window[i] * window[i];
            }

            synthesis_pos += self.hop_synthesis;
            first_frame = false;
        }

        normalize_overlap(&mut output, &window_sum);
        output.truncate(target_len);
        output
    }

    /// Clears the accumulator state so the instance can process another
    /// channel from scratch.
    fn reset(&mut self) {
        self.phase_accum.fill(0.0);
        self.prev_phase.fill(0.0);
    }
}

/// Divides the overlap-added output by the accumulated squared-window sum,
/// flooring the divisor so sparsely covered edges are not blown up.
fn normalize_overlap(output: &mut [f32], window_sum: &[f32]) {
    let max_sum = window_sum.iter().cloned().fold(0.0f32, f32::max);
    if max_sum <= 0.0 {
        return;
    }
    let floor = (max_sum * WINDOW_SUM_FLOOR_RATIO).max(1e-6);
    for (sample, &ws) in output.iter_mut().zip(window_sum.iter()) {
        *sample /= ws.max(floor);
    }
}

/// Wraps a phase value into (-PI, PI].
#[inline]
fn wrap_phase(phase: f32) -> f32 {
    let p = phase + PI;
    p - (p / TWO_PI).floor() * TWO_PI - PI
}
