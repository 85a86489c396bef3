//! Data preprocessing module
//!
//! Standardization applied before every cross-validated fit.

mod scaler;

pub use scaler::StandardScaler;
