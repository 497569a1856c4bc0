//! Capture-to-spectrum conversion pipeline
//!
//! Runs imbalance calibration, DC removal, windowing, the DC-centered
//! transform and log-power scaling in order, once per capture.

use log::debug;
use num_complex::Complex64;

use super::fft::{fft_shift, FftEngine};
use super::windows::{apply_window_inplace, generate_window, WindowType};
use crate::calibrate::{dc, iq};
use crate::error::SpectrumError;

/// Capture length delivered by the target receiver's data packets.
pub const DEFAULT_CAPTURE_LEN: usize = 1024;

/// Smallest magnitude admitted to the log conversion. An exactly-zero bin
/// floors here instead of producing -inf.
const MIN_MAGNITUDE: f64 = 1e-10;

/// Fixed noise-floor constants for one hardware revision.
///
/// Changing these shifts the displayed noise floor up or down without
/// altering the spectral shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConstants {
    /// Baseline of the FFT noise floor in dB
    pub fft_baseline: f64,

    /// Usable dynamic range of the ADC in dB
    pub adc_dynamic_range: f64,
}

impl Default for CalibrationConstants {
    fn default() -> Self {
        Self {
            fft_baseline: -28.5,
            adc_dynamic_range: 72.5,
        }
    }
}

impl CalibrationConstants {
    /// Offset added to every log-magnitude bin for a given hardware
    /// reference level.
    pub fn noise_level_offset(&self, reference_level: f64) -> f64 {
        reference_level - self.fft_baseline - self.adc_dynamic_range
    }
}

/// One block of raw I/Q samples, already normalized to full scale by the
/// unpacking layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// In-phase channel
    pub i: Vec<f64>,

    /// Quadrature channel
    pub q: Vec<f64>,
}

impl Capture {
    pub fn new(i: Vec<f64>, q: Vec<f64>) -> Self {
        Self { i, q }
    }

    /// Number of complex samples (the FFT length)
    pub fn len(&self) -> usize {
        self.i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }
}

/// Calibrated power spectrum, ascending frequency, DC in the middle bin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumResult {
    /// One dBm value per frequency bin
    pub power_dbm: Vec<f64>,

    /// Center frequency the capture was taken at, passed through untouched
    pub center_freq: f64,
}

impl SpectrumResult {
    /// Number of frequency bins
    pub fn len(&self) -> usize {
        self.power_dbm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power_dbm.is_empty()
    }

    /// Strongest bin and its power in dBm.
    pub fn find_peak(&self) -> (usize, f64) {
        let mut peak_bin = 0;
        let mut peak_power = f64::NEG_INFINITY;
        for (bin, &power) in self.power_dbm.iter().enumerate() {
            if power > peak_power {
                peak_power = power;
                peak_bin = bin;
            }
        }
        (peak_bin, peak_power)
    }
}

/// Capture-to-spectrum converter with reusable working buffers.
///
/// The conversion itself is a pure function of its inputs; the struct only
/// caches the FFT plan, window coefficients and scratch storage so repeated
/// same-length captures stay allocation-free apart from the returned result.
pub struct SpectrumProcessor {
    constants: CalibrationConstants,
    window_type: WindowType,
    fft: FftEngine,

    /// Window coefficients for the current capture length
    window: Vec<f64>,

    /// Zero-mean I scratch
    scratch_i: Vec<f64>,

    /// Calibrated, zero-mean Q scratch
    scratch_q: Vec<f64>,

    /// Windowed complex capture, transformed in place
    scratch_bins: Vec<Complex64>,
}

impl SpectrumProcessor {
    /// Create a processor for one hardware profile with the standard Hann
    /// analysis window.
    pub fn new(constants: CalibrationConstants) -> Self {
        Self::with_window(constants, WindowType::Hann)
    }

    /// Create a processor with a non-default analysis window.
    ///
    /// The calibrated-dBm guarantees are characterized for Hann; other
    /// windows are for experimentation.
    pub fn with_window(constants: CalibrationConstants, window_type: WindowType) -> Self {
        Self {
            constants,
            window_type,
            fft: FftEngine::new(DEFAULT_CAPTURE_LEN),
            window: generate_window(window_type, DEFAULT_CAPTURE_LEN),
            scratch_i: vec![0.0; DEFAULT_CAPTURE_LEN],
            scratch_q: vec![0.0; DEFAULT_CAPTURE_LEN],
            scratch_bins: vec![Complex64::default(); DEFAULT_CAPTURE_LEN],
        }
    }

    /// Get calibration constants
    pub fn constants(&self) -> &CalibrationConstants {
        &self.constants
    }

    /// Get analysis window type
    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    /// Convert one capture into a calibrated, DC-centered dBm spectrum.
    ///
    /// `reference_level` is the hardware-reported full-scale power for this
    /// capture; `center_freq` is carried through to the result untouched.
    ///
    /// # Errors
    /// Invalid input is rejected before any stage runs; degenerate
    /// calibration and non-finite log power are surfaced instead of
    /// contaminating the output.
    pub fn process(
        &mut self,
        capture: &Capture,
        reference_level: f64,
        center_freq: f64,
    ) -> Result<SpectrumResult, SpectrumError> {
        validate(capture)?;
        let len = capture.len();
        self.ensure_len(len);

        // Stage 1: imbalance calibration of the Q channel
        let estimate = iq::estimate_imbalance(&capture.i, &capture.q)?;
        debug!(
            "imbalance estimate over {} samples: ratio {:.6}, phase {:.6} rad",
            len, estimate.ratio, estimate.phase
        );
        estimate.apply(&capture.i, &capture.q, &mut self.scratch_q);
        self.scratch_i.copy_from_slice(&capture.i);

        // Stage 2: per-channel DC removal
        dc::remove_dc_inplace(&mut self.scratch_i);
        dc::remove_dc_inplace(&mut self.scratch_q);

        // Stage 3: windowed complex capture
        for (bin, (&re, &im)) in self.scratch_i.iter().zip(&self.scratch_q).enumerate() {
            self.scratch_bins[bin] = Complex64::new(re, im);
        }
        apply_window_inplace(&mut self.scratch_bins, &self.window);

        // Stage 4: forward transform, then move DC to the middle bin
        self.fft.process(&mut self.scratch_bins);
        fft_shift(&mut self.scratch_bins);

        // Stage 5: log-power scaling against the hardware noise floor
        let offset = self.constants.noise_level_offset(reference_level);
        let mut power_dbm = Vec::with_capacity(len);
        for (bin, value) in self.scratch_bins.iter().enumerate() {
            let magnitude = value.norm().max(MIN_MAGNITUDE);
            let power = 20.0 * magnitude.log10() + offset;
            if !power.is_finite() {
                return Err(SpectrumError::NumericOverflow(bin));
            }
            power_dbm.push(power);
        }

        // The shift folds leftover DC energy into the middle bin; replace it
        // with the mean of its neighbors.
        let mid = len / 2;
        power_dbm[mid] = (power_dbm[mid - 1] + power_dbm[mid + 1]) / 2.0;

        Ok(SpectrumResult {
            power_dbm,
            center_freq,
        })
    }

    /// Resize the plan, window and scratch arena when the capture length
    /// changes. No-op on the common same-length path.
    fn ensure_len(&mut self, len: usize) {
        if self.fft.fft_size() != len {
            self.fft.resize(len);
            self.window = generate_window(self.window_type, len);
            self.scratch_i.resize(len, 0.0);
            self.scratch_q.resize(len, 0.0);
            self.scratch_bins.resize(len, Complex64::default());
        }
    }
}

/// One-shot conversion without a reusable processor.
pub fn compute_spectrum(
    capture: &Capture,
    reference_level: f64,
    constants: &CalibrationConstants,
) -> Result<Vec<f64>, SpectrumError> {
    let mut processor = SpectrumProcessor::new(*constants);
    processor
        .process(capture, reference_level, 0.0)
        .map(|result| result.power_dbm)
}

fn validate(capture: &Capture) -> Result<(), SpectrumError> {
    if capture.i.len() != capture.q.len() {
        return Err(SpectrumError::LengthMismatch {
            i_len: capture.i.len(),
            q_len: capture.q.len(),
        });
    }

    let len = capture.i.len();
    if len < 4 || len % 2 != 0 {
        return Err(SpectrumError::BadLength(len));
    }

    for (index, &sample) in capture.i.iter().enumerate() {
        if !sample.is_finite() {
            return Err(SpectrumError::NonFiniteInput {
                channel: "I",
                index,
            });
        }
    }
    for (index, &sample) in capture.q.iter().enumerate() {
        if !sample.is_finite() {
            return Err(SpectrumError::NonFiniteInput {
                channel: "Q",
                index,
            });
        }
    }

    Ok(())
}
