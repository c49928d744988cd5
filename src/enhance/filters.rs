//! In-place enhancement filters for RGB images
//!
//! Every filter blends the image with a degenerate version of itself:
//! `out = degenerate + factor * (original - degenerate)`, clamped to the
//! channel range and truncated. A factor of 1.0 returns the original,
//! 0.0 returns the degenerate image, and values above 1.0 extrapolate away
//! from it.

use image::RgbImage;

// Weights of the 3x3 smoothing kernel used as the sharpness baseline
const SMOOTH_CENTER_WEIGHT: u32 = 5;
const SMOOTH_KERNEL_TOTAL: u32 = 13;

/// Blend one channel value away from (or towards) its degenerate value
pub fn blend_channel(degenerate: u8, original: u8, factor: f64) -> u8 {
    let degenerate = f64::from(degenerate);
    let value = factor.mul_add(f64::from(original) - degenerate, degenerate);
    value.clamp(0.0, 255.0) as u8
}

/// ITU-R 601 luma in 16-bit fixed point, rounded
pub const fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb;
    ((19_595 * r as u32 + 38_470 * g as u32 + 7_471 * b as u32 + 0x8000) >> 16) as u8
}

fn is_identity(factor: f64) -> bool {
    (factor - 1.0).abs() <= f64::EPSILON
}

/// Sharpen (factor > 1) or soften (factor < 1) against a 3x3 smoothed copy
///
/// The outermost ring of pixels has no full neighbourhood and is left as is.
/// Works row by row with a three-row window instead of a second image.
pub fn sharpness(image: &mut RgbImage, factor: f64) {
    let (width, height) = (image.width() as usize, image.height() as usize);
    if is_identity(factor) || width < 3 || height < 3 {
        return;
    }

    let stride = width * 3;
    let buffer: &mut [u8] = image;
    let mut rows = buffer.chunks_exact_mut(stride);

    let (Some(first), Some(second)) = (rows.next(), rows.next()) else {
        return;
    };
    let mut above = first.to_vec();
    let mut current = second.to_vec();
    let mut target = second;

    for below in rows {
        smooth_blend_row(&above, &current, below, target, factor);

        std::mem::swap(&mut above, &mut current);
        current.copy_from_slice(below);
        target = below;
    }
}

// `above`, `current` and `below` hold original pixels; `target` receives the blend
fn smooth_blend_row(above: &[u8], current: &[u8], below: &[u8], target: &mut [u8], factor: f64) {
    let (above, _) = above.as_chunks::<3>();
    let (current, _) = current.as_chunks::<3>();
    let (below, _) = below.as_chunks::<3>();
    let (target, _) = target.as_chunks_mut::<3>();

    let windows = above
        .windows(3)
        .zip(current.windows(3))
        .zip(below.windows(3));

    for (((top, middle), bottom), out) in windows.zip(target.iter_mut().skip(1)) {
        let ([t0, t1, t2], [m0, m1, m2], [b0, b1, b2]) = (top, middle, bottom) else {
            continue;
        };
        for channel in 0..3 {
            let pick = |px: &[u8; 3]| px.get(channel).copied().map_or(0, u32::from);
            let sum = pick(t0)
                + pick(t1)
                + pick(t2)
                + pick(m0)
                + SMOOTH_CENTER_WEIGHT * pick(m1)
                + pick(m2)
                + pick(b0)
                + pick(b1)
                + pick(b2);
            // Kernel total is odd so there is never an exact half to round
            let smoothed = ((sum + SMOOTH_KERNEL_TOTAL / 2) / SMOOTH_KERNEL_TOTAL) as u8;
            if let (Some(slot), Some(original)) = (out.get_mut(channel), m1.get(channel)) {
                *slot = blend_channel(smoothed, *original, factor);
            }
        }
    }
}

/// Stretch (factor > 1) or flatten (factor < 1) contrast around the mean luma
pub fn contrast(image: &mut RgbImage, factor: f64) {
    if is_identity(factor) || image.width() == 0 || image.height() == 0 {
        return;
    }

    let total: u64 = image.pixels().map(|pixel| u64::from(luma(pixel.0))).sum();
    let count = u64::from(image.width()) * u64::from(image.height());
    let mean = ((total as f64 / count as f64) + 0.5) as u8;

    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0 {
            *channel = blend_channel(mean, *channel, factor);
        }
    }
}

/// Scale every channel towards black (factor < 1) or away from it
pub fn brightness(image: &mut RgbImage, factor: f64) {
    if is_identity(factor) {
        return;
    }

    for channel in image.iter_mut() {
        *channel = blend_channel(0, *channel, factor);
    }
}

/// Push colours away from (factor > 1) or towards (factor < 1) their grey value
pub fn saturation(image: &mut RgbImage, factor: f64) {
    if is_identity(factor) {
        return;
    }

    for pixel in image.pixels_mut() {
        let grey = luma(pixel.0);
        for channel in &mut pixel.0 {
            *channel = blend_channel(grey, *channel, factor);
        }
    }
}
