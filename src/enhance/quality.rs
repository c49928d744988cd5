//! Enhancement factors and the full RGB to print conversion step

use crate::enhance::color::{CmykImage, rgb_to_cmyk};
use crate::enhance::filters;
use crate::io::configuration::{
    DEFAULT_BRIGHTNESS, DEFAULT_CONTRAST, DEFAULT_SATURATION, DEFAULT_SHARPNESS,
};
use crate::io::error::{Result, invalid_parameter};
use image::DynamicImage;

/// Multiplicative strength of each enhancement filter
///
/// 1.0 leaves the image unchanged; 0.0 yields the filter's degenerate image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhanceFactors {
    /// Edge enhancement against a smoothed copy
    pub sharpness: f64,
    /// Spread around the mean grey level
    pub contrast: f64,
    /// Distance from black
    pub brightness: f64,
    /// Distance from each pixel's own grey value
    pub saturation: f64,
}

impl Default for EnhanceFactors {
    fn default() -> Self {
        Self {
            sharpness: DEFAULT_SHARPNESS,
            contrast: DEFAULT_CONTRAST,
            brightness: DEFAULT_BRIGHTNESS,
            saturation: DEFAULT_SATURATION,
        }
    }
}

impl EnhanceFactors {
    /// Factors that leave an image untouched
    pub const fn identity() -> Self {
        Self {
            sharpness: 1.0,
            contrast: 1.0,
            brightness: 1.0,
            saturation: 1.0,
        }
    }

    /// Reject factors the filters cannot meaningfully apply
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for any negative or non-finite factor
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("sharpness", self.sharpness),
            ("contrast", self.contrast),
            ("brightness", self.brightness),
            ("saturation", self.saturation),
        ];

        for (parameter, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &"must be a finite, non-negative factor",
                ));
            }
        }

        Ok(())
    }
}

/// Enhance an image in RGB and convert the result to CMYK
///
/// Filters run in a fixed order: sharpness, contrast, brightness, saturation.
/// The RGB buffer is modified in place and released once converted.
pub fn enhance_quality(image: DynamicImage, factors: &EnhanceFactors) -> CmykImage {
    let mut rgb = image.into_rgb8();

    filters::sharpness(&mut rgb, factors.sharpness);
    filters::contrast(&mut rgb, factors.contrast);
    filters::brightness(&mut rgb, factors.brightness);
    filters::saturation(&mut rgb, factors.saturation);

    rgb_to_cmyk(&rgb)
}
