//! Conversions between physical print sizes and pixel dimensions

use crate::io::configuration::{MAX_CANVAS_DIMENSION, MAX_CANVAS_PIXELS};
use crate::io::error::{Result, computation_error, invalid_parameter};
use image::GenericImageView;

/// Centimeters in one inch
pub const CM_PER_INCH: f64 = 2.54;

/// Physical size of a pixel area at the given resolution
///
/// Returns (width, height) in centimeters. `dpi` must be greater than zero.
pub fn size_in_centimeters(width_px: u32, height_px: u32, dpi: f64) -> (f64, f64) {
    (
        f64::from(width_px) / dpi * CM_PER_INCH,
        f64::from(height_px) / dpi * CM_PER_INCH,
    )
}

/// Physical size of an image at the given resolution
pub fn image_size_in_centimeters<I: GenericImageView>(image: &I, dpi: f64) -> (f64, f64) {
    let (width, height) = image.dimensions();
    size_in_centimeters(width, height, dpi)
}

/// Convert a length in centimeters to the nearest whole pixel count
///
/// # Errors
///
/// Returns a computation error if the result is not finite, negative,
/// or does not fit in a `u32`
pub fn centimeters_to_pixels(cm: f64, dpi: f64) -> Result<u32> {
    let pixels = (cm * dpi / CM_PER_INCH).round();

    if !pixels.is_finite() || pixels < 0.0 || pixels > f64::from(u32::MAX) {
        return Err(computation_error(
            "centimeters_to_pixels",
            &format!("{cm} cm at {dpi} dpi gives {pixels} pixels"),
        ));
    }

    Ok(pixels as u32)
}

/// Pixel dimensions of a run, derived once from the physical request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLayout {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Edge length of the square tile in pixels
    pub tile_size: u32,
}

impl PixelLayout {
    /// Derive the canvas and tile sizes for a physical pattern
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension rounds to zero pixels, exceeds
    /// [`MAX_CANVAS_DIMENSION`], or cannot be represented at all, or if the
    /// canvas as a whole holds more than [`MAX_CANVAS_PIXELS`]
    pub fn from_physical(pattern_size_cm: (f64, f64), repeat_every_cm: f64, dpi: f64) -> Result<Self> {
        let canvas_width = checked_dimension("canvas_width", pattern_size_cm.0, dpi)?;
        let canvas_height = checked_dimension("canvas_height", pattern_size_cm.1, dpi)?;
        let tile_size = checked_dimension("tile_size", repeat_every_cm, dpi)?;

        let layout = Self {
            canvas_width,
            canvas_height,
            tile_size,
        };
        if layout.canvas_pixels() > MAX_CANVAS_PIXELS {
            return Err(invalid_parameter(
                "pattern_size_cm",
                &format!("{} x {} cm", pattern_size_cm.0, pattern_size_cm.1),
                &format!(
                    "{canvas_width}x{canvas_height} = {} pixels exceeds the limit of {MAX_CANVAS_PIXELS}",
                    layout.canvas_pixels()
                ),
            ));
        }

        Ok(layout)
    }

    /// Canvas dimensions as (width, height)
    pub const fn canvas(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Total number of canvas pixels
    pub const fn canvas_pixels(&self) -> u64 {
        self.canvas_width as u64 * self.canvas_height as u64
    }
}

fn checked_dimension(parameter: &'static str, cm: f64, dpi: f64) -> Result<u32> {
    let pixels = centimeters_to_pixels(cm, dpi)?;

    if pixels == 0 {
        return Err(invalid_parameter(
            parameter,
            &format!("{cm} cm"),
            &format!("rounds to zero pixels at {dpi} dpi"),
        ));
    }
    if pixels > MAX_CANVAS_DIMENSION {
        return Err(invalid_parameter(
            parameter,
            &format!("{cm} cm"),
            &format!("{pixels} pixels exceeds the limit of {MAX_CANVAS_DIMENSION}"),
        ));
    }

    Ok(pixels)
}
