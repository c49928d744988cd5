//! Four-channel print colour representation and RGB conversion

use image::RgbImage;

/// Bytes per CMYK pixel
pub const CMYK_CHANNELS: usize = 4;

/// An 8-bit interleaved CMYK raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmykImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CmykImage {
    /// Wrap raw interleaved `C, M, Y, K` bytes
    ///
    /// Returns `None` if `data` does not hold exactly `width * height` pixels.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(CMYK_CHANNELS)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// (width, height) in pixels
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw interleaved samples
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Samples of a single pixel, or `None` outside the image
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * CMYK_CHANNELS;
        let (pixels, _) = self.data.get(index..)?.as_chunks::<CMYK_CHANNELS>();
        pixels.first().copied()
    }
}

/// Naive device conversion of one RGB pixel, with no black generation
pub const fn cmyk_pixel(rgb: [u8; 3]) -> [u8; 4] {
    let [r, g, b] = rgb;
    [255 - r, 255 - g, 255 - b, 0]
}

/// Convert an RGB image to CMYK without a colour profile
pub fn rgb_to_cmyk(rgb: &RgbImage) -> CmykImage {
    let (pixels, _) = rgb.as_raw().as_chunks::<3>();
    let data: Vec<u8> = pixels.iter().flat_map(|pixel| cmyk_pixel(*pixel)).collect();

    CmykImage {
        width: rgb.width(),
        height: rgb.height(),
        data,
    }
}
