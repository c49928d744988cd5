//! Print preparation: enhancement filters and CMYK conversion

/// CMYK raster type and RGB to CMYK conversion
pub mod color;
/// Sharpness, contrast, brightness and saturation filters
pub mod filters;
/// Enhancement factors and the combined enhance-then-convert step
pub mod quality;

pub use color::{CmykImage, rgb_to_cmyk};
pub use quality::{EnhanceFactors, enhance_quality};
