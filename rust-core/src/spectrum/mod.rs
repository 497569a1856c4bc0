//! Spectral analysis with FFT

pub mod fft;
pub mod processor;
pub mod windows;

pub use fft::FftEngine;
pub use processor::{compute_spectrum, SpectrumProcessor};
pub use windows::{generate_window, WindowType};
