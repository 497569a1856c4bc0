//! Complex FFT engine using rustfft
//!
//! Plans and scratch space are cached per capture length and reused across
//! calls on the hot per-capture path.

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT engine for complex I/Q captures
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Forward transform plan for the current size
    fft: Arc<dyn Fft<f64>>,

    /// Planner kept around so re-planning reuses cached twiddles
    planner: FftPlanner<f64>,

    /// Reusable scratch buffer for the in-place transform
    scratch: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine planned for `fft_size` samples
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex64::default(); fft.get_inplace_scratch_len()];

        Self {
            fft_size,
            fft,
            planner,
            scratch,
        }
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Re-plan for a different capture length. No-op when unchanged.
    pub fn resize(&mut self, fft_size: usize) {
        if fft_size != self.fft_size {
            self.fft = self.planner.plan_fft_forward(fft_size);
            self.scratch
                .resize(self.fft.get_inplace_scratch_len(), Complex64::default());
            self.fft_size = fft_size;
        }
    }

    /// Forward transform in place. `buffer.len()` must equal the FFT size.
    pub fn process(&mut self, buffer: &mut [Complex64]) {
        debug_assert_eq!(buffer.len(), self.fft_size);
        self.fft.process_with_scratch(buffer, &mut self.scratch);
    }
}

/// Half-spectrum swap moving DC from index 0 to index len/2.
///
/// out[k] = in[(k + len/2) mod len]; callers guarantee an even length, which
/// makes this the exact mirror ordering expected by the display axis.
pub fn fft_shift<T>(buffer: &mut [T]) {
    debug_assert_eq!(buffer.len() % 2, 0);
    let half = buffer.len() / 2;
    buffer.rotate_left(half);
}
