//! Frame analyzer: windowed frame extraction and forward/inverse spectral
//! transforms for one channel at a time.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::core::window::{generate_window, WindowType};
use crate::error::{Result, TransformError};

/// A fixed-length extract of one channel, tagged with its start offset.
/// The final frame of a signal is zero-padded up to the window length.
#[derive(Debug, Clone)]
pub struct FrameWindow {
    /// Sample offset of the first sample within the source channel.
    pub start: usize,
    /// Windowable samples; always exactly `window_len` long.
    pub samples: Vec<f32>,
}

/// Complex spectrum of one frame: `window_len / 2 + 1` bins for real input.
#[derive(Debug, Clone)]
pub struct SpectralFrame {
    /// Start offset of the frame this spectrum was derived from.
    pub start: usize,
    /// Positive-frequency bins, DC through Nyquist.
    pub bins: Vec<Complex<f32>>,
}

impl SpectralFrame {
    /// Magnitude of a bin.
    #[inline]
    pub fn magnitude(&self, bin: usize) -> f32 {
        self.bins[bin].norm()
    }

    /// Phase of a bin in radians.
    #[inline]
    pub fn phase(&self, bin: usize) -> f32 {
        self.bins[bin].arg()
    }
}

/// Splits a channel into overlapping windowed frames and transforms them
/// to and from the frequency domain.
///
/// The FFT plans and the window are computed once at construction and
/// reused for every frame; the analyzer owns a scratch buffer so repeated
/// transforms do not allocate.
pub struct FrameAnalyzer {
    window_len: usize,
    hop: usize,
    window: Vec<f32>,
    fft_forward: Arc<dyn Fft<f32>>,
    fft_inverse: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
}

impl FrameAnalyzer {
    /// Creates an analyzer for the given window length and hop size.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidParameter`] if the window length is
    /// not an even power of two, or if the hop is zero or not smaller than
    /// the window length (consecutive frames must overlap, otherwise
    /// resynthesis leaves gaps).
    pub fn new(window_len: usize, hop: usize, window_type: WindowType) -> Result<Self> {
        if window_len < 2 || !window_len.is_power_of_two() {
            return Err(TransformError::InvalidParameter(format!(
                "window length must be an even power of two, got {window_len}"
            )));
        }
        if hop == 0 || hop >= window_len {
            return Err(TransformError::InvalidParameter(format!(
                "hop size must be in 1..{window_len}, got {hop}"
            )));
        }
        let mut planner = FftPlanner::new();
        Ok(Self {
            window: generate_window(window_type, window_len),
            fft_forward: planner.plan_fft_forward(window_len),
            fft_inverse: planner.plan_fft_inverse(window_len),
            buffer: vec![Complex::new(0.0, 0.0); window_len],
            window_len,
            hop,
        })
    }

    /// The window length in samples.
    #[inline]
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// The hop size in samples.
    #[inline]
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of positive-frequency bins (`window_len / 2 + 1`).
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.window_len / 2 + 1
    }

    /// The analysis/synthesis window.
    #[inline]
    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Number of frames [`frames`](Self::frames) will yield for a channel
    /// of `input_len` samples.
    pub fn num_frames(&self, input_len: usize) -> usize {
        input_len.div_ceil(self.hop)
    }

    /// Lazy sequence of frames advancing by the hop size, zero-padding the
    /// final incomplete frame. The iterator borrows only the sample slice,
    /// so it can be restarted by calling this again.
    pub fn frames<'a>(&self, samples: &'a [f32]) -> FrameIter<'a> {
        FrameIter {
            samples,
            window_len: self.window_len,
            hop: self.hop,
            pos: 0,
        }
    }

    /// Applies the analysis window and computes the forward transform.
    pub fn forward(&mut self, frame: &FrameWindow) -> SpectralFrame {
        for ((slot, &sample), &win) in self
            .buffer
            .iter_mut()
            .zip(frame.samples.iter())
            .zip(self.window.iter())
        {
            *slot = Complex::new(sample * win, 0.0);
        }
        self.fft_forward.process(&mut self.buffer);
        SpectralFrame {
            start: frame.start,
            bins: self.buffer[..self.window_len / 2 + 1].to_vec(),
        }
    }

    /// Inverse-transforms a spectrum and applies the synthesis window,
    /// returning a `window_len`-sample time-domain segment ready for
    /// overlap-add.
    pub fn inverse(&mut self, frame: &SpectralFrame) -> Vec<f32> {
        let num_bins = self.window_len / 2 + 1;
        self.buffer[..num_bins].copy_from_slice(&frame.bins);
        // Mirror negative frequencies for a real-valued result.
        for bin in 1..num_bins - 1 {
            self.buffer[self.window_len - bin] = frame.bins[bin].conj();
        }
        self.fft_inverse.process(&mut self.buffer);
        let norm = 1.0 / self.window_len as f32;
        self.buffer
            .iter()
            .zip(self.window.iter())
            .map(|(c, &w)| c.re * norm * w)
            .collect()
    }
}

/// Iterator over hop-spaced [`FrameWindow`]s of one channel.
pub struct FrameIter<'a> {
    samples: &'a [f32],
    window_len: usize,
    hop: usize,
    pos: usize,
}

impl Iterator for FrameIter<'_> {
    type Item = FrameWindow;

    fn next(&mut self) -> Option<FrameWindow> {
        if self.pos >= self.samples.len() {
            return None;
        }
        let end = (self.pos + self.window_len).min(self.samples.len());
        let mut samples = self.samples[self.pos..end].to_vec();
        samples.resize(self.window_len, 0.0);
        let frame = FrameWindow {
            start: self.pos,
            samples,
        };
        self.pos += self.hop;
        Some(frame)
    }
}
