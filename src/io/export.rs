//! CMYK TIFF export staged through a temporary file

use crate::enhance::CmykImage;
use crate::io::configuration::{STAGING_FILE_PREFIX, TIFF_ROWS_PER_STRIP};
use crate::io::error::{PatternError, Result};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use tiff::TiffResult;
use tiff::encoder::compression::{Deflate, DeflateLevel};
use tiff::encoder::{Rational, TiffEncoder, colortype};
use tiff::tags::ResolutionUnit;

// Fractional resolutions are stored in thousandths of a dot
const RESOLUTION_DENOMINATOR: u32 = 1000;

/// Express a DPI value as a TIFF rational
pub fn dpi_rational(dpi: f64) -> Rational {
    if dpi.fract() == 0.0 && dpi <= f64::from(u32::MAX) {
        Rational {
            n: dpi as u32,
            d: 1,
        }
    } else {
        Rational {
            n: (dpi * f64::from(RESOLUTION_DENOMINATOR)).round() as u32,
            d: RESOLUTION_DENOMINATOR,
        }
    }
}

/// Encode a CMYK image as a Deflate-compressed TIFF into any seekable writer
///
/// # Errors
///
/// Returns the encoder error if any header, tag or strip cannot be written
pub fn write_cmyk_tiff<W: Write + Seek>(writer: W, image: &CmykImage, dpi: f64) -> TiffResult<()> {
    let (width, height) = image.dimensions();
    let mut encoder = TiffEncoder::new(writer)?;
    let mut tiff_image = encoder.new_image_with_compression::<colortype::CMYK8, Deflate>(
        width,
        height,
        Deflate::with_level(DeflateLevel::Balanced),
    )?;

    tiff_image.resolution(ResolutionUnit::Inch, dpi_rational(dpi));
    tiff_image.rows_per_strip(TIFF_ROWS_PER_STRIP)?;
    tiff_image.write_data(image.as_raw())
}

/// Save a CMYK image to `path` as a print-ready TIFF
///
/// The image is encoded into a temporary file next to `path` and renamed
/// into place only once complete. On failure the temporary file is removed
/// and any existing file at `path` is left untouched.
///
/// # Errors
///
/// Returns `FileSystem` if the staging file cannot be created, flushed or
/// renamed, and `ImageExport` if TIFF encoding fails
pub fn save_cmyk_tiff(image: &CmykImage, path: &Path, dpi: f64) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_FILE_PREFIX)
        .suffix(".tiff")
        .tempfile_in(directory)
        .map_err(|e| PatternError::FileSystem {
            path: directory.to_path_buf(),
            operation: "create staging file",
            source: e,
        })?;

    let mut writer = BufWriter::new(staged.as_file_mut());
    write_cmyk_tiff(&mut writer, image, dpi).map_err(|e| PatternError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| PatternError::FileSystem {
        path: path.to_path_buf(),
        operation: "flush staging file",
        source: e,
    })?;
    drop(writer);

    staged.persist(path).map_err(|e| PatternError::FileSystem {
        path: path.to_path_buf(),
        operation: "move staging file into place",
        source: e.error,
    })?;

    log::debug!(
        "Wrote {}x{} CMYK TIFF to '{}'",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}
