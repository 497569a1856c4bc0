//! Window functions for spectral analysis
//!
//! Tapering the capture before the transform reduces leakage from the finite
//! observation window. The pipeline runs Hann; the other shapes are here for
//! experimentation with the same generator.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5*(1 - cos(2πn/(M-1)))
    /// Mainlobe width: 8π/M, sidelobe attenuation: ~44 dB
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    /// Mainlobe width: 8π/M, sidelobe attenuation: ~53 dB
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    /// Mainlobe width: 12π/M, sidelobe attenuation: ~74 dB
    Blackman,

    /// Rectangular window (no tapering)
    Rectangular,
}

/// Generate symmetric window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length < 2 {
        return vec![1.0; length];
    }

    let m = length as f64;
    let mut window = Vec::with_capacity(length);

    match window_type {
        WindowType::Hann => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.5 * (1.0 - angle.cos()));
            }
        }

        WindowType::Hamming => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.54 - 0.46 * angle.cos());
            }
        }

        WindowType::Blackman => {
            for n in 0..length {
                let angle1 = 2.0 * PI * n as f64 / (m - 1.0);
                let angle2 = 4.0 * PI * n as f64 / (m - 1.0);
                window.push(0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos());
            }
        }

        WindowType::Rectangular => {
            window.resize(length, 1.0);
        }
    }

    window
}

/// Multiply a complex capture by precomputed window coefficients.
pub fn apply_window_inplace(buffer: &mut [Complex64], window: &[f64]) {
    for (s, &w) in buffer.iter_mut().zip(window) {
        *s *= w;
    }
}

/// Calculate window amplitude correction factor
///
/// Tapering reduces signal amplitude; multiplying the transform magnitude by
/// this factor compensates.
pub fn window_correction_factor(window_type: WindowType, length: usize) -> f64 {
    let window = generate_window(window_type, length);
    let sum: f64 = window.iter().sum();
    length as f64 / sum
}

/// Calculate window power correction factor (for power spectral density)
pub fn window_power_correction_factor(window_type: WindowType, length: usize) -> f64 {
    let window = generate_window(window_type, length);
    let sum_sq: f64 = window.iter().map(|&w| w * w).sum();
    length as f64 / sum_sq
}
