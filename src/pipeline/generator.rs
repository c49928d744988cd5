//! End-to-end pattern generation: load, tile, enhance, export
//!
//! A run is strictly linear. Each stage either hands its result to the next
//! or ends the run with a [`PatternError`]; the error is reported to the
//! progress reporter before it is returned, and no output file exists unless
//! the final stage completed.

use crate::enhance::enhance_quality;
use crate::io::configuration::PatternConfig;
use crate::io::error::{PatternError, Result};
use crate::io::export::save_cmyk_tiff;
use crate::io::image::{Resolution, SourceImage, load_source};
use crate::io::progress::{ProgressEvent, ProgressReporter};
use crate::math::PixelLayout;
use crate::math::units::image_size_in_centimeters;
use crate::spatial::TileGrid;
use crate::spatial::tiling::{fill_canvas, prepare_tile};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSummary {
    /// Where the TIFF was written
    pub output_path: PathBuf,
    /// Resolution used for every conversion and embedded in the output
    pub resolution: Resolution,
    /// Physical size of the source image as (width, height) in centimeters
    pub input_size_cm: (f64, f64),
    /// Canvas and tile pixel sizes
    pub layout: PixelLayout,
    /// Tile grid that was pasted
    pub grid: TileGrid,
}

impl PatternSummary {
    /// Number of tiles pasted onto the canvas
    pub const fn tiles_placed(&self) -> u64 {
        self.grid.tile_count()
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Output written successfully
    Saved,
    /// Input file did not exist; nothing was decoded
    AbortedMissingInput,
    /// Input file could not be decoded
    AbortedDecodeError,
    /// Output file could not be written; the computed canvas was discarded
    AbortedSaveError,
    /// Parameters were rejected before or during layout
    AbortedInvalidConfiguration,
}

impl Termination {
    /// Classify the result of a run
    pub const fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Saved,
            Err(error) => Self::from_error(error),
        }
    }

    /// Terminal state a given error leads to
    pub const fn from_error(error: &PatternError) -> Self {
        match error {
            PatternError::MissingInput { .. } => Self::AbortedMissingInput,
            PatternError::ImageLoad { .. } => Self::AbortedDecodeError,
            PatternError::ImageExport { .. } | PatternError::FileSystem { .. } => {
                Self::AbortedSaveError
            }
            PatternError::InvalidParameter { .. } | PatternError::Computation { .. } => {
                Self::AbortedInvalidConfiguration
            }
        }
    }

    /// True only for [`Termination::Saved`]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Create a repeating print pattern from a source image
///
/// Every stage is announced to `reporter`; a failure is announced as
/// [`ProgressEvent::Failed`] and then returned.
///
/// # Errors
///
/// - `InvalidParameter` if `config` fails validation or the layout rounds to
///   an unusable size
/// - `MissingInput` if `input_path` does not exist
/// - `ImageLoad` if the input cannot be decoded
/// - `ImageExport` or `FileSystem` if the output cannot be written
pub fn create_pattern<R>(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &PatternConfig,
    reporter: &mut R,
) -> Result<PatternSummary>
where
    R: ProgressReporter + ?Sized,
{
    let result = run_stages(input_path.as_ref(), output_path.as_ref(), config, &mut *reporter);

    if let Err(error) = &result {
        reporter.report(&ProgressEvent::Failed {
            reason: error.to_string(),
        });
    }

    result
}

fn run_stages<R>(
    input_path: &Path,
    output_path: &Path,
    config: &PatternConfig,
    reporter: &mut R,
) -> Result<PatternSummary>
where
    R: ProgressReporter + ?Sized,
{
    reporter.report(&ProgressEvent::Started);
    config.validate()?;

    if !input_path.exists() {
        return Err(PatternError::MissingInput {
            path: input_path.to_path_buf(),
        });
    }

    reporter.report(&ProgressEvent::OpeningInput {
        path: input_path.to_path_buf(),
    });
    let SourceImage {
        pixels: source,
        resolution,
        ..
    } = load_source(input_path, config.fallback_dpi)?;
    reporter.report(&ProgressEvent::InputOpened {
        width: source.width(),
        height: source.height(),
    });

    let dpi = resolution.dpi;
    reporter.report(&ProgressEvent::ResolutionDetected {
        dpi,
        source: resolution.source,
    });

    let input_size_cm = image_size_in_centimeters(&source, dpi);
    reporter.report(&ProgressEvent::InputSize {
        width_cm: input_size_cm.0,
        height_cm: input_size_cm.1,
    });

    let layout = PixelLayout::from_physical(config.pattern_size_cm, config.repeat_every_cm, dpi)?;
    log::debug!(
        "Layout at {dpi} dpi: canvas {}x{} px ({} pixels), tile {} px",
        layout.canvas_width,
        layout.canvas_height,
        layout.canvas_pixels(),
        layout.tile_size
    );
    reporter.report(&ProgressEvent::LayoutComputed { layout });

    reporter.report(&ProgressEvent::ResizingTile {
        tile_size: layout.tile_size,
    });
    let tile = prepare_tile(&source, layout.tile_size);
    drop(source);

    reporter.report(&ProgressEvent::AllocatingCanvas {
        width: layout.canvas_width,
        height: layout.canvas_height,
    });
    let canvas = fill_canvas(&tile, layout.canvas(), &mut *reporter);

    reporter.report(&ProgressEvent::Enhancing);
    let print_ready = enhance_quality(DynamicImage::ImageRgb8(canvas), &config.enhancement);

    reporter.report(&ProgressEvent::Saving {
        path: output_path.to_path_buf(),
    });
    save_cmyk_tiff(&print_ready, output_path, dpi)?;
    reporter.report(&ProgressEvent::Saved {
        path: output_path.to_path_buf(),
    });

    Ok(PatternSummary {
        output_path: output_path.to_path_buf(),
        resolution,
        input_size_cm,
        layout,
        grid: TileGrid::from_layout(&layout),
    })
}

/// Reusable generator holding a configuration and a reporter
pub struct PatternGenerator<R> {
    config: PatternConfig,
    reporter: R,
}

impl<R: ProgressReporter> PatternGenerator<R> {
    /// Create a generator
    pub const fn new(config: PatternConfig, reporter: R) -> Self {
        Self { config, reporter }
    }

    /// Configuration applied to every run
    pub const fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Generate one pattern
    ///
    /// # Errors
    ///
    /// Propagates any error from [`create_pattern`]
    pub fn generate(
        &mut self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<PatternSummary> {
        create_pattern(input_path, output_path, &self.config, &mut self.reporter)
    }

    /// Give back the reporter, e.g. to inspect what it collected
    pub fn into_reporter(self) -> R {
        self.reporter
    }
}
