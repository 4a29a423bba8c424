//! Window functions for spectral analysis and resynthesis.

use std::f64::consts::PI;

/// 4-term Blackman-Harris coefficients.
const BH_A0: f64 = 0.35875;
const BH_A1: f64 = 0.48829;
const BH_A2: f64 = 0.14128;
const BH_A3: f64 = 0.01168;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    Hann,
    BlackmanHarris,
    /// Kaiser-Bessel window; beta scaled by 100 (e.g. 800 = beta 8.0).
    Kaiser(u32),
}

/// Generates a window of the given type and size.
pub fn generate_window(window_type: WindowType, size: usize) -> Vec<f32> {
    match size {
        0 => return vec![],
        1 => return vec![1.0],
        _ => {}
    }
    let n = size as f64;
    match window_type {
        WindowType::Hann => (0..size)
            .map(|i| {
                let x = (2.0 * PI * i as f64) / (n - 1.0);
                (0.5 * (1.0 - x.cos())) as f32
            })
            .collect(),
        WindowType::BlackmanHarris => (0..size)
            .map(|i| {
                let x = i as f64 / (n - 1.0);
                let w = BH_A0 - BH_A1 * (2.0 * PI * x).cos() + BH_A2 * (4.0 * PI * x).cos()
                    - BH_A3 * (6.0 * PI * x).cos();
                w as f32
            })
            .collect(),
        WindowType::Kaiser(beta_100) => {
            let beta = beta_100 as f64 / 100.0;
            let denom = bessel_i0(beta);
            (0..size)
                .map(|i| {
                    let x = 2.0 * i as f64 / (n - 1.0) - 1.0;
                    let arg = beta * (1.0 - x * x).max(0.0).sqrt();
                    (bessel_i0(arg) / denom) as f32
                })
                .collect()
        }
    }
}

/// Zeroth-order modified Bessel function of the first kind, via the power
/// series expansion. Shared by the Kaiser window and the sinc resampler.
pub(crate) fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let half_x = x / 2.0;
    for k in 1..=30 {
        term *= (half_x / k as f64) * (half_x / k as f64);
        sum += term;
        if term < sum * 1e-15 {
            break;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_endpoints_and_symmetry() {
        let w = generate_window(WindowType::Hann, 1024);
        assert_eq!(w.len(), 1024);
        assert!(w[0].abs() < 1e-6);
        assert!(w[1023].abs() < 1e-6);
        assert!((w[512] - 1.0).abs() < 0.01);
        for i in 0..512 {
            assert!((w[i] - w[1023 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_blackman_harris_sidelobe_suppression() {
        let w = generate_window(WindowType::BlackmanHarris, 1024);
        assert!(w[0] < 0.01);
        assert!(w[1023] < 0.01);
        for i in 0..512 {
            assert!((w[i] - w[1023 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_kaiser_peak_in_middle() {
        let w = generate_window(WindowType::Kaiser(800), 1024);
        let mid = w[512];
        for &v in &w {
            assert!(v <= mid + 1e-6);
        }
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(generate_window(WindowType::Hann, 0).is_empty());
        assert_eq!(generate_window(WindowType::Hann, 1), vec![1.0]);
        assert_eq!(generate_window(WindowType::Kaiser(800), 1), vec![1.0]);
    }

    #[test]
    fn test_bessel_i0_known_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-10);
        assert!((bessel_i0(1.0) - 1.2660658777).abs() < 1e-6);
        assert!((bessel_i0(3.0) - 4.880792585).abs() < 1e-4);
    }
}
