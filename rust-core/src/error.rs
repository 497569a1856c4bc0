//! Pipeline error types
//!
//! Every fallible stage reports through `SpectrumError`; nothing is retried
//! internally and no stage substitutes a default for degenerate input.

use thiserror::Error;

/// Errors reported by the capture-to-spectrum conversion.
///
/// Variants fall into three groups: invalid input (`LengthMismatch`,
/// `BadLength`, `NonFiniteInput`), degenerate calibration
/// (`DegenerateEnergy`, `PhaseOutOfRange`, `DegeneratePhase`) and numeric
/// overflow (`NumericOverflow`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("I/Q length mismatch: {i_len} I samples vs {q_len} Q samples")]
    LengthMismatch { i_len: usize, q_len: usize },

    #[error("unsupported capture length {0}: need an even count of at least 4 samples")]
    BadLength(usize),

    #[error("non-finite {channel} sample at index {index}")]
    NonFiniteInput { channel: &'static str, index: usize },

    #[error("{channel} channel energy is zero or non-finite, imbalance estimate is undefined")]
    DegenerateEnergy { channel: &'static str },

    #[error("phase estimate out of range: sin(phi) = {0}")]
    PhaseOutOfRange(f64),

    #[error("correction phase {0} rad collapses the quadrature axis")]
    DegeneratePhase(f64),

    #[error("non-finite power in bin {0} after log scaling")]
    NumericOverflow(usize),
}
