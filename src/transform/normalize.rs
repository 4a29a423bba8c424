//! Loudness normalization: measure once, apply a single gain factor.

/// How the normalizer measures the signal level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelMode {
    /// Maximum absolute sample value across all channels.
    Peak,
    /// Root-mean-square level across all channels.
    Rms,
}

/// Default linear peak target: -1 dBFS.
pub const DEFAULT_TARGET_LEVEL: f32 = 0.891_250_9;

/// Hard ceiling for any post-gain sample.
const SAMPLE_CEILING: f32 = 1.0;

/// Levels below this are treated as silence; silence is left untouched
/// rather than amplifying the noise floor.
const SILENCE_FLOOR: f32 = 1e-8;

/// Measures the signal level in the given mode.
pub fn measure_level(samples: &[f32], mode: LevelMode) -> f32 {
    match mode {
        LevelMode::Peak => peak(samples),
        LevelMode::Rms => {
            if samples.is_empty() {
                return 0.0;
            }
            let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
            (sum_sq / samples.len() as f64).sqrt() as f32
        }
    }
}

/// Maximum absolute sample value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Computes the gain factor that brings the measured level to `target`,
/// clamped so the post-gain peak never exceeds the sample ceiling.
/// Returns 1.0 for silence.
pub fn gain_factor(samples: &[f32], mode: LevelMode, target: f32) -> f32 {
    let measured = measure_level(samples, mode);
    if measured < SILENCE_FLOOR {
        return 1.0;
    }
    let gain = target / measured;
    let peak = peak(samples);
    if peak * gain > SAMPLE_CEILING {
        SAMPLE_CEILING / peak
    } else {
        gain
    }
}

/// Scales every sample by the computed gain factor, in place.
/// Returns the gain that was applied.
pub fn normalize(samples: &mut [f32], mode: LevelMode, target: f32) -> f32 {
    let gain = gain_factor(samples, mode, target);
    if gain != 1.0 {
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
    gain
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(amp: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| amp * (2.0 * PI * 440.0 * i as f32 / 44100.0).sin())
            .collect()
    }

    #[test]
    fn test_peak_measurement() {
        assert_eq!(measure_level(&[0.1, -0.7, 0.3], LevelMode::Peak), 0.7);
        assert_eq!(measure_level(&[], LevelMode::Peak), 0.0);
    }

    #[test]
    fn test_rms_measurement() {
        // Constant signal: RMS equals the value.
        let rms = measure_level(&[0.5; 100], LevelMode::Rms);
        assert!((rms - 0.5).abs() < 1e-6);
        assert_eq!(measure_level(&[], LevelMode::Rms), 0.0);
    }

    #[test]
    fn test_peak_normalization_hits_target() {
        let mut samples = sine(0.3, 44100);
        let gain = normalize(&mut samples, LevelMode::Peak, DEFAULT_TARGET_LEVEL);
        assert!(gain > 1.0);
        let new_peak = peak(&samples);
        assert!((new_peak - DEFAULT_TARGET_LEVEL).abs() < 1e-3);
    }

    #[test]
    fn test_attenuates_hot_signal() {
        let mut samples = sine(0.99, 44100);
        normalize(&mut samples, LevelMode::Peak, 0.5);
        assert!((peak(&samples) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_ceiling_never_exceeded() {
        // RMS targets can imply gains that would clip; the peak clamp wins.
        let mut samples = sine(0.9, 44100);
        normalize(&mut samples, LevelMode::Rms, 0.9);
        assert!(peak(&samples) <= SAMPLE_CEILING + 1e-6);
    }

    #[test]
    fn test_silence_unchanged() {
        let mut samples = vec![0.0f32; 4096];
        let gain = normalize(&mut samples, LevelMode::Peak, DEFAULT_TARGET_LEVEL);
        assert_eq!(gain, 1.0);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_near_silence_unchanged() {
        let mut samples = vec![1e-10f32; 4096];
        let gain = normalize(&mut samples, LevelMode::Peak, DEFAULT_TARGET_LEVEL);
        assert_eq!(gain, 1.0);
    }

    #[test]
    fn test_gain_applied_exactly_once() {
        let samples = sine(0.25, 8192);
        let gain = gain_factor(&samples, LevelMode::Peak, 0.5);
        let mut normalized = samples.clone();
        normalize(&mut normalized, LevelMode::Peak, 0.5);
        for (a, b) in samples.iter().zip(normalized.iter()) {
            assert!((a * gain - b).abs() < 1e-7);
        }
    }
}
