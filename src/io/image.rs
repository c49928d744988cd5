//! Source image loading and print resolution discovery

use crate::io::configuration::EXIF_DEFAULT_DPI;
use crate::io::error::{PatternError, Result};
use crate::math::units::CM_PER_INCH;
use image::{ImageFormat, ImageReader, RgbImage};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tiff::decoder::ifd::Value;
use tiff::tags::Tag;

const METERS_PER_INCH: f64 = 0.0254;

// JFIF density units
const JFIF_UNIT_DOTS_PER_INCH: u8 = 1;
const JFIF_UNIT_DOTS_PER_CM: u8 = 2;

// TIFF and EXIF ResolutionUnit values
const TIFF_UNIT_INCH: u16 = 2;
const TIFF_UNIT_CENTIMETER: u16 = 3;

// Markers walked before giving up on finding a JFIF header
const MAX_JPEG_SEGMENTS: usize = 16;

/// Where the resolution of a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Read from metadata embedded in the source file
    Embedded,
    /// Source had no usable metadata; the configured fallback was used
    Fallback,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "from image metadata"),
            Self::Fallback => write!(f, "default"),
        }
    }
}

/// Horizontal print resolution in dots per inch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Dots per inch, always finite and positive
    pub dpi: f64,
    /// Where `dpi` came from
    pub source: ResolutionSource,
}

impl Resolution {
    /// Prefer a detected resolution, falling back when none was found
    pub fn resolve(detected: Option<f64>, fallback: f64) -> Self {
        match detected.filter(|dpi| is_usable_dpi(*dpi)) {
            Some(dpi) => Self {
                dpi,
                source: ResolutionSource::Embedded,
            },
            None => Self {
                dpi: fallback,
                source: ResolutionSource::Fallback,
            },
        }
    }
}

/// A decoded source image ready for tiling
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Pixel data converted to 8-bit RGB
    pub pixels: RgbImage,
    /// Resolution used for every physical conversion in the run
    pub resolution: Resolution,
    /// Container format the image was decoded from, when recognised
    pub format: Option<ImageFormat>,
}

/// Decode a source image and discover its resolution
///
/// The file handle is released before this returns.
///
/// # Errors
///
/// Returns `MissingInput` if nothing exists at `path`, without attempting to
/// decode. Returns `ImageLoad` if the file cannot be opened or decoded.
pub fn load_source(path: &Path, fallback_dpi: f64) -> Result<SourceImage> {
    if !path.exists() {
        return Err(PatternError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let load_error = |source| PatternError::ImageLoad {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| load_error(image::ImageError::IoError(e)))?;
    let format = reader.format();
    let decoded = reader.decode().map_err(load_error)?;

    let detected = format.and_then(|format| read_resolution(path, format));
    if detected.is_none() {
        log::warn!(
            "No usable DPI metadata in '{}', assuming {fallback_dpi}",
            path.display()
        );
    }

    Ok(SourceImage {
        pixels: decoded.into_rgb8(),
        resolution: Resolution::resolve(detected, fallback_dpi),
        format,
    })
}

/// Read the horizontal DPI embedded in an image file
///
/// Only JPEG (JFIF, then EXIF), PNG (`pHYs`) and TIFF (`XResolution`) carry
/// a resolution this understands. Missing, zero or unreadable metadata
/// yields `None`.
pub fn read_resolution(path: &Path, format: ImageFormat) -> Option<f64> {
    let file = match File::open(path) {
        Ok(file) => BufReader::new(file),
        Err(e) => {
            log::debug!("Cannot reopen '{}' for metadata: {e}", path.display());
            return None;
        }
    };

    let dpi = match format {
        ImageFormat::Jpeg => jpeg_density(file),
        ImageFormat::Png => png_density(file),
        ImageFormat::Tiff => tiff_density(file),
        _ => None,
    };

    dpi.filter(|dpi| is_usable_dpi(*dpi))
}

fn is_usable_dpi(dpi: f64) -> bool {
    dpi.is_finite() && dpi > 0.0
}

/// Horizontal DPI of a JPEG
///
/// JFIF density wins when it states a unit. Otherwise an EXIF block decides:
/// its `XResolution` in its `ResolutionUnit`, or [`EXIF_DEFAULT_DPI`] when
/// either tag is missing. A JPEG with neither yields `None`.
pub fn jpeg_density<R: BufRead + Seek>(mut reader: R) -> Option<f64> {
    if let Some(dpi) = jfif_density(&mut reader) {
        return Some(dpi);
    }

    reader.rewind().ok()?;
    exif_density(&mut reader)
}

/// Walk JPEG markers looking for the JFIF APP0 density fields
pub fn jfif_density<R: Read + Seek>(mut reader: R) -> Option<f64> {
    let mut soi = [0u8; 2];
    reader.read_exact(&mut soi).ok()?;
    if soi != [0xFF, 0xD8] {
        return None;
    }

    for _ in 0..MAX_JPEG_SEGMENTS {
        let mut header = [0u8; 4];
        reader.read_exact(&mut header).ok()?;
        let [0xFF, marker, len_hi, len_lo] = header else {
            return None;
        };
        // Start of scan: no more headers follow
        if marker == 0xDA {
            return None;
        }

        let length = u16::from_be_bytes([len_hi, len_lo]);
        let body_length = i64::from(length.checked_sub(2)?);

        if marker == 0xE0 && body_length >= 12 {
            let mut body = [0u8; 12];
            reader.read_exact(&mut body).ok()?;
            if body.get(..5) == Some(b"JFIF\0".as_slice()) {
                let [_, _, _, _, _, _, _, unit, x_hi, x_lo, _, _] = body;
                let density = f64::from(u16::from_be_bytes([x_hi, x_lo]));
                return match unit {
                    JFIF_UNIT_DOTS_PER_INCH => Some(density),
                    JFIF_UNIT_DOTS_PER_CM => Some(density * CM_PER_INCH),
                    _ => None,
                };
            }
            reader.seek(SeekFrom::Current(body_length - 12)).ok()?;
        } else {
            reader.seek(SeekFrom::Current(body_length)).ok()?;
        }
    }

    None
}

/// Resolution from the EXIF block of any container `kamadak-exif` understands
///
/// Returns `None` when there is no readable EXIF block at all.
pub fn exif_density<R: BufRead + Seek>(reader: &mut R) -> Option<f64> {
    let exif = match exif::Reader::new().read_from_container(reader) {
        Ok(exif) => exif,
        Err(e) => {
            log::debug!("No usable EXIF block: {e}");
            return None;
        }
    };

    Some(
        exif_resolution(&exif)
            .filter(|dpi| is_usable_dpi(*dpi))
            .unwrap_or(EXIF_DEFAULT_DPI),
    )
}

// Both tags are required; centimeters are the only unit that is rescaled
fn exif_resolution(exif: &exif::Exif) -> Option<f64> {
    let unit = exif
        .get_field(exif::Tag::ResolutionUnit, exif::In::PRIMARY)?
        .value
        .get_uint(0)?;
    let x_resolution = match &exif
        .get_field(exif::Tag::XResolution, exif::In::PRIMARY)?
        .value
    {
        exif::Value::Rational(values) => values.first()?,
        _ => return None,
    };
    if x_resolution.denom == 0 {
        return None;
    }

    let dpi = x_resolution.to_f64();
    if unit == u32::from(TIFF_UNIT_CENTIMETER) {
        Some(dpi * CM_PER_INCH)
    } else {
        Some(dpi)
    }
}

/// Physical pixel density from a PNG `pHYs` chunk
pub fn png_density(reader: BufReader<File>) -> Option<f64> {
    let decoder = png::Decoder::new(reader);
    let png_reader = match decoder.read_info() {
        Ok(png_reader) => png_reader,
        Err(e) => {
            log::debug!("PNG header unreadable for metadata: {e}");
            return None;
        }
    };

    let dims = png_reader.info().pixel_dims?;
    match dims.unit {
        png::Unit::Meter => Some(f64::from(dims.xppu) * METERS_PER_INCH),
        _ => None,
    }
}

/// Horizontal resolution from TIFF `XResolution` and `ResolutionUnit` tags
pub fn tiff_density<R: Read + Seek>(reader: R) -> Option<f64> {
    let mut decoder = match tiff::decoder::Decoder::new(reader) {
        Ok(decoder) => decoder,
        Err(e) => {
            log::debug!("TIFF header unreadable for metadata: {e}");
            return None;
        }
    };

    let x_resolution = match decoder.find_tag(Tag::XResolution).ok()?? {
        Value::Rational(n, d) if d != 0 => f64::from(n) / f64::from(d),
        _ => return None,
    };

    let unit = match decoder.find_tag(Tag::ResolutionUnit).ok()? {
        Some(Value::Short(unit)) => unit,
        Some(Value::Unsigned(unit)) => u16::try_from(unit).ok()?,
        _ => TIFF_UNIT_INCH,
    };

    match unit {
        TIFF_UNIT_INCH => Some(x_resolution),
        TIFF_UNIT_CENTIMETER => Some(x_resolution * CM_PER_INCH),
        _ => None,
    }
}
