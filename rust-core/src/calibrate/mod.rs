//! Hardware artifact calibration for raw I/Q captures

pub mod dc;
pub mod iq;

pub use dc::{mean, remove_dc_inplace};
pub use iq::{calibrate_quadrature, estimate_imbalance, ImbalanceEstimate};
