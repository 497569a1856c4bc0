//! I/Q imbalance estimation and correction
//!
//! Analog front-ends leak gain and phase mismatch between the I and Q paths,
//! which shows up as a mirrored spurious image in the spectrum. The estimator
//! here is a method-of-moments phase fit over a single capture.

use crate::error::SpectrumError;

/// Smallest usable |cos(phi)|; below this the correction would divide by a
/// numerically-zero quadrature axis.
const MIN_COS_PHI: f64 = 1e-12;

/// Per-capture imbalance estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImbalanceEstimate {
    /// Full-scale channel amplitude, sqrt(2*sum(i^2)/N)
    pub amplitude: f64,

    /// Gain ratio between the channels, sqrt(sum(i^2)/sum(q^2))
    pub ratio: f64,

    /// Estimated phase skew in radians
    pub phase: f64,
}

impl ImbalanceEstimate {
    /// Apply the correction, writing the calibrated Q channel into `out`.
    ///
    /// q'[n] = (sin(phi)*i[n] + ratio*q[n]) / cos(phi)
    pub fn apply(&self, i: &[f64], q: &[f64], out: &mut [f64]) {
        let (sin_phi, cos_phi) = self.phase.sin_cos();
        for ((y, &xi), &xq) in out.iter_mut().zip(i).zip(q) {
            *y = (sin_phi * xi + self.ratio * xq) / cos_phi;
        }
    }
}

/// Estimate gain and phase imbalance between equal-length I and Q channels.
///
/// Both summations accumulate sequentially in f64 so repeat runs on the same
/// capture stay bit-identical.
///
/// # Errors
/// * `DegenerateEnergy` - either channel has zero (or non-finite) energy
/// * `PhaseOutOfRange` - the moment estimate lands outside [-1, 1] and
///   cannot be inverted
/// * `DegeneratePhase` - the estimated skew collapses the quadrature axis
pub fn estimate_imbalance(i: &[f64], q: &[f64]) -> Result<ImbalanceEstimate, SpectrumError> {
    debug_assert_eq!(i.len(), q.len());
    let n = i.len() as f64;

    let sum_sq_i: f64 = i.iter().map(|&x| x * x).sum();
    let sum_sq_q: f64 = q.iter().map(|&x| x * x).sum();

    if !sum_sq_i.is_finite() || sum_sq_i <= 0.0 {
        return Err(SpectrumError::DegenerateEnergy { channel: "I" });
    }
    if !sum_sq_q.is_finite() || sum_sq_q <= 0.0 {
        return Err(SpectrumError::DegenerateEnergy { channel: "Q" });
    }

    let amplitude = (2.0 * sum_sq_i / n).sqrt();
    let ratio = (sum_sq_i / sum_sq_q).sqrt();

    let product_sum: f64 = i
        .iter()
        .zip(q)
        .map(|(&xi, &xq)| (xq / amplitude) * ratio * (xi / amplitude))
        .sum();
    let sin_phi = 2.0 * product_sum / n;

    if !sin_phi.is_finite() || sin_phi.abs() > 1.0 {
        return Err(SpectrumError::PhaseOutOfRange(sin_phi));
    }

    let phase = -sin_phi.asin();
    if phase.cos().abs() < MIN_COS_PHI {
        return Err(SpectrumError::DegeneratePhase(phase));
    }

    Ok(ImbalanceEstimate {
        amplitude,
        ratio,
        phase,
    })
}

/// Estimate and correct in one step, returning the calibrated Q channel.
pub fn calibrate_quadrature(i: &[f64], q: &[f64]) -> Result<Vec<f64>, SpectrumError> {
    let estimate = estimate_imbalance(i, q)?;
    let mut out = vec![0.0; q.len()];
    estimate.apply(i, q, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Quadrature tone at `cycles` full periods with a phase skew on Q.
    fn quadrature_tone(len: usize, cycles: usize, skew: f64) -> (Vec<f64>, Vec<f64>) {
        let w = 2.0 * PI * cycles as f64 / len as f64;
        let i = (0..len).map(|n| (w * n as f64).cos()).collect();
        let q = (0..len).map(|n| (w * n as f64 + skew).sin()).collect();
        (i, q)
    }

    #[test]
    fn balanced_capture_is_left_unchanged() {
        let i = vec![1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0];
        let q = vec![0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];

        let est = estimate_imbalance(&i, &q).unwrap();
        assert!((est.ratio - 1.0).abs() < 1e-12);
        assert!(est.phase.abs() < 1e-12);
        assert!((est.amplitude - 1.0).abs() < 1e-12);

        let calibrated = calibrate_quadrature(&i, &q).unwrap();
        for (c, orig) in calibrated.iter().zip(&q) {
            assert!((c - orig).abs() < 1e-12);
        }
    }

    #[test]
    fn recovers_injected_phase_skew() {
        let skew = 0.05;
        let (i, q) = quadrature_tone(64, 5, skew);

        let est = estimate_imbalance(&i, &q).unwrap();
        assert!((est.phase + skew).abs() < 1e-9);
        assert!((est.ratio - 1.0).abs() < 1e-9);

        // Correction should hand back the skew-free quadrature channel.
        let calibrated = calibrate_quadrature(&i, &q).unwrap();
        let (_, q_clean) = quadrature_tone(64, 5, 0.0);
        for (c, expect) in calibrated.iter().zip(&q_clean) {
            assert!((c - expect).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_q_channel_is_degenerate() {
        let i = vec![1.0, -1.0, 1.0, -1.0];
        let q = vec![0.0; 4];
        let err = estimate_imbalance(&i, &q).unwrap_err();
        assert_eq!(err, SpectrumError::DegenerateEnergy { channel: "Q" });
    }

    #[test]
    fn zero_i_channel_is_degenerate() {
        let i = vec![0.0; 4];
        let q = vec![1.0, -1.0, 1.0, -1.0];
        let err = estimate_imbalance(&i, &q).unwrap_err();
        assert_eq!(err, SpectrumError::DegenerateEnergy { channel: "I" });
    }
}
