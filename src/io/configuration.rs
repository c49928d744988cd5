//! Pattern constants and runtime configuration defaults

use crate::enhance::EnhanceFactors;
use crate::io::error::{Result, invalid_parameter};

// Physical layout defaults
/// Default pattern width in centimeters
pub const DEFAULT_PATTERN_WIDTH_CM: f64 = 100.0;
/// Default pattern height in centimeters
pub const DEFAULT_PATTERN_HEIGHT_CM: f64 = 150.0;
/// Default distance between tile repeats in centimeters
pub const DEFAULT_REPEAT_EVERY_CM: f64 = 10.0;

/// Resolution assumed when the source carries no usable DPI metadata
pub const DEFAULT_DPI: f64 = 300.0;
/// Resolution of a JPEG whose EXIF block has no usable resolution tags
pub const EXIF_DEFAULT_DPI: f64 = 72.0;

// Enhancement defaults, 1.0 is the identity for every factor
/// Default sharpness factor
pub const DEFAULT_SHARPNESS: f64 = 2.0;
/// Default contrast factor
pub const DEFAULT_CONTRAST: f64 = 1.0;
/// Default brightness factor
pub const DEFAULT_BRIGHTNESS: f64 = 1.0;
/// Default saturation factor
pub const DEFAULT_SATURATION: f64 = 1.5;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed canvas dimension on either axis, in pixels
pub const MAX_CANVAS_DIMENSION: u32 = 100_000;
/// Maximum total canvas pixels; at 7 bytes per pixel this is about 2.8 GB
pub const MAX_CANVAS_PIXELS: u64 = 400_000_000;

// Output settings
/// Rows written per TIFF strip
pub const TIFF_ROWS_PER_STRIP: u32 = 64;
/// Prefix for the temporary file a pattern is staged in before the final rename
pub const STAGING_FILE_PREFIX: &str = ".patterntile-";

// Entry point paths
/// Source image read by the binary
pub const DEFAULT_INPUT_PATH: &str = "input_image.jpg";
/// Destination written by the binary
pub const DEFAULT_OUTPUT_PATH: &str = "output_pattern.tiff";

// Progress bar display settings
/// Width of the tiling progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Immutable parameters for a single pattern run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternConfig {
    /// Target pattern size as (width, height) in centimeters
    pub pattern_size_cm: (f64, f64),
    /// Edge length of one square tile repeat in centimeters
    pub repeat_every_cm: f64,
    /// Enhancement factors applied after tiling
    pub enhancement: EnhanceFactors,
    /// Resolution used when the source has no DPI metadata
    pub fallback_dpi: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            pattern_size_cm: (DEFAULT_PATTERN_WIDTH_CM, DEFAULT_PATTERN_HEIGHT_CM),
            repeat_every_cm: DEFAULT_REPEAT_EVERY_CM,
            enhancement: EnhanceFactors::default(),
            fallback_dpi: DEFAULT_DPI,
        }
    }
}

impl PatternConfig {
    /// Replace the pattern size
    #[must_use]
    pub const fn with_pattern_size(mut self, width_cm: f64, height_cm: f64) -> Self {
        self.pattern_size_cm = (width_cm, height_cm);
        self
    }

    /// Replace the repeat interval
    #[must_use]
    pub const fn with_repeat_every(mut self, repeat_every_cm: f64) -> Self {
        self.repeat_every_cm = repeat_every_cm;
        self
    }

    /// Replace the enhancement factors
    #[must_use]
    pub const fn with_enhancement(mut self, enhancement: EnhanceFactors) -> Self {
        self.enhancement = enhancement;
        self
    }

    /// Replace the fallback resolution
    #[must_use]
    pub const fn with_fallback_dpi(mut self, dpi: f64) -> Self {
        self.fallback_dpi = dpi;
        self
    }

    /// Check every value is usable before any file is touched
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a size, the repeat interval or the
    /// fallback DPI is not a finite positive number, or if an enhancement
    /// factor is rejected by [`EnhanceFactors::validate`]
    pub fn validate(&self) -> Result<()> {
        require_positive("pattern_width_cm", self.pattern_size_cm.0)?;
        require_positive("pattern_height_cm", self.pattern_size_cm.1)?;
        require_positive("repeat_every_cm", self.repeat_every_cm)?;
        require_positive("fallback_dpi", self.fallback_dpi)?;
        self.enhancement.validate()
    }
}

fn require_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid_parameter(
            parameter,
            &value,
            &"must be a finite number greater than zero",
        ))
    }
}
