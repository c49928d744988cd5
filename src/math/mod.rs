//! Mathematical utilities for physical sizing

/// Centimeter, inch and pixel conversions
pub mod units;

pub use units::PixelLayout;
