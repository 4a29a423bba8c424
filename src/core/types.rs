use crate::core::window::WindowType;
use crate::error::{Result, TransformError};
use crate::transform::normalize::{LevelMode, DEFAULT_TARGET_LEVEL};

/// A single audio sample (32-bit float, nominal range -1.0 to 1.0).
pub type Sample = f32;

/// An in-memory audio signal: interleaved samples plus channel layout and rate.
///
/// For mono audio, samples are stored sequentially: `[s0, s1, s2, ...]`.
/// For multi-channel audio, samples are interleaved frame by frame:
/// `[c0_0, c1_0, c0_1, c1_1, ...]`. The channel count and sample rate are
/// fixed for the signal's lifetime; pipeline stages take ownership and hand
/// back a new `Signal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Raw interleaved sample data.
    pub data: Vec<Sample>,
    /// Number of channels (1 = mono, 2 = stereo, ...).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Signal {
    /// Creates a new signal.
    ///
    /// # Errors
    /// Returns [`TransformError::EmptySignal`] if `channels` is 0 and
    /// [`TransformError::InvalidParameter`] if `sample_rate` is 0.
    pub fn new(data: Vec<Sample>, channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(TransformError::EmptySignal);
        }
        if sample_rate == 0 {
            return Err(TransformError::InvalidParameter(
                "sample rate must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            data,
            channels,
            sample_rate,
        })
    }

    /// Creates a mono signal.
    pub fn from_mono(data: Vec<Sample>, sample_rate: u32) -> Self {
        Self {
            data,
            channels: 1,
            sample_rate,
        }
    }

    /// Number of frames (total samples / channels).
    pub fn num_frames(&self) -> usize {
        self.data.len() / self.channels as usize
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Returns true if the signal contains no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Parameters for a pitch/speed transformation.
///
/// `semitones` may be fractional and is unbounded, but shifts beyond roughly
/// two octaves (|semitones| > 24) degrade quality audibly; that is documented
/// behavior, not an error. The spectral analysis defaults (2048-sample Hann
/// window, 4:1 overlap) are tunable, not a fixed contract.
#[derive(Debug, Clone)]
pub struct TransformParams {
    /// Pitch shift in semitones (0 = no change).
    pub semitones: f64,
    /// Speed factor (> 0; 1.0 = unchanged, < 1 slower, > 1 faster).
    pub speed: f64,
    /// Whether to normalize loudness after transformation.
    pub normalize: bool,
    /// Linear target level for normalization (default: -1 dBFS).
    pub target_level: f32,
    /// Whether normalization measures peak or RMS level.
    pub level_mode: LevelMode,
    /// Analysis window length in samples (even power of two).
    pub window_len: usize,
    /// Overlap factor; the analysis hop is `window_len / overlap`.
    pub overlap: usize,
    /// Analysis/synthesis window function.
    pub window_type: WindowType,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            semitones: 0.0,
            speed: 1.0,
            normalize: true,
            target_level: DEFAULT_TARGET_LEVEL,
            level_mode: LevelMode::Peak,
            window_len: 2048,
            overlap: 4,
            window_type: WindowType::Hann,
        }
    }
}

impl TransformParams {
    /// Creates default parameters (no pitch shift, no speed change,
    /// peak normalization to -1 dBFS).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pitch shift in semitones.
    pub fn with_semitones(mut self, semitones: f64) -> Self {
        self.semitones = semitones;
        self
    }

    /// Sets the speed factor.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Enables or disables normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Sets the normalization target level (linear, 0 < level <= 1).
    pub fn with_target_level(mut self, target_level: f32) -> Self {
        self.target_level = target_level;
        self
    }

    /// Sets the normalization level mode.
    pub fn with_level_mode(mut self, level_mode: LevelMode) -> Self {
        self.level_mode = level_mode;
        self
    }

    /// Sets the analysis window length.
    pub fn with_window_len(mut self, window_len: usize) -> Self {
        self.window_len = window_len;
        self
    }

    /// Sets the window function.
    pub fn with_window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    /// The analysis hop size in samples.
    pub fn hop(&self) -> usize {
        self.window_len / self.overlap
    }

    /// The resampling ratio implied by the semitone shift: `2^(semitones/12)`.
    pub fn pitch_ratio(&self) -> f64 {
        2f64.powf(self.semitones / 12.0)
    }

    /// Returns true if the transform would leave the signal untouched.
    pub fn is_identity(&self) -> bool {
        self.semitones == 0.0 && self.speed == 1.0 && !self.normalize
    }

    /// Validates all parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(TransformError::InvalidParameter(format!(
                "speed must be positive and finite, got {}",
                self.speed
            )));
        }
        if !self.semitones.is_finite() {
            return Err(TransformError::InvalidParameter(format!(
                "semitones must be finite, got {}",
                self.semitones
            )));
        }
        if self.window_len == 0 || !self.window_len.is_power_of_two() {
            return Err(TransformError::InvalidParameter(format!(
                "window length must be a non-zero power of two, got {}",
                self.window_len
            )));
        }
        if self.overlap < 2 {
            return Err(TransformError::InvalidParameter(format!(
                "overlap factor must be at least 2 (hop < window length), got {}",
                self.overlap
            )));
        }
        if self.window_len / self.overlap == 0 {
            return Err(TransformError::InvalidParameter(format!(
                "overlap factor {} too large for window length {}",
                self.overlap, self.window_len
            )));
        }
        if !(0.0..=1.0).contains(&self.target_level) || self.target_level == 0.0 {
            return Err(TransformError::InvalidParameter(format!(
                "target level must be in (0, 1], got {}",
                self.target_level
            )));
        }
        Ok(())
    }
}
