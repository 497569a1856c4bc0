//! iqscope - Calibrated I/Q Spectrum Core
//!
//! Converts raw receiver captures into display-ready dBm spectra: I/Q
//! imbalance calibration, DC removal, Hann windowing, a DC-centered FFT and
//! log-power scaling against hardware calibration constants.

pub mod calibrate;
pub mod error;
pub mod spectrum;

pub use error::SpectrumError;
pub use spectrum::processor::{
    compute_spectrum, CalibrationConstants, Capture, SpectrumProcessor, SpectrumResult,
};
pub use spectrum::windows::WindowType;
