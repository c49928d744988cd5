//! Repeating print pattern generation from a single source image
//!
//! A source image is resized to a square tile matching a physical repeat
//! interval, pasted across a canvas sized in centimeters, enhanced, and
//! written out as a CMYK TIFF ready for textile or surface printing.

#![forbid(unsafe_code)]

/// Sharpness, contrast, brightness and saturation filters plus CMYK conversion
pub mod enhance;
/// Input/output operations, configuration and error handling
pub mod io;
/// Physical size to pixel conversions
pub mod math;
/// End-to-end pattern generation
pub mod pipeline;
/// Tile grid layout and canvas synthesis
pub mod spatial;

pub use io::configuration::PatternConfig;
pub use io::error::{PatternError, Result};
pub use pipeline::{PatternSummary, Termination, create_pattern};
