//! Stage-by-stage progress reporting for a pattern run
//!
//! The pipeline never prints. It emits [`ProgressEvent`]s into a
//! [`ProgressReporter`] and the caller decides where they go.

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use crate::io::image::ResolutionSource;
use crate::math::PixelLayout;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Something observable that happened during a pattern run
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The run has begun
    Started,
    /// About to decode the source image
    OpeningInput {
        /// Source image path
        path: PathBuf,
    },
    /// Source decoded successfully
    InputOpened {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Resolution settled for the run
    ResolutionDetected {
        /// Dots per inch used for every conversion
        dpi: f64,
        /// Whether the value came from metadata or the fallback
        source: ResolutionSource,
    },
    /// Physical size of the source at the detected resolution
    InputSize {
        /// Width in centimeters
        width_cm: f64,
        /// Height in centimeters
        height_cm: f64,
    },
    /// Canvas and tile pixel sizes computed
    LayoutComputed {
        /// The derived layout
        layout: PixelLayout,
    },
    /// Resampling the source down to tile size
    ResizingTile {
        /// Target edge length in pixels
        tile_size: u32,
    },
    /// Allocating the blank canvas
    AllocatingCanvas {
        /// Canvas width in pixels
        width: u32,
        /// Canvas height in pixels
        height: u32,
    },
    /// One more tile pasted onto the canvas
    TilePlaced {
        /// Tiles placed so far
        placed: u64,
        /// Tiles the grid will hold in total
        total: u64,
    },
    /// Applying enhancement filters and converting to CMYK
    Enhancing,
    /// Writing the output file
    Saving {
        /// Destination path
        path: PathBuf,
    },
    /// Output file is complete and in place
    Saved {
        /// Destination path
        path: PathBuf,
    },
    /// The run stopped early
    Failed {
        /// Human-readable reason
        reason: String,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "Starting pattern creation..."),
            Self::OpeningInput { path } => write!(f, "Opening input image {}...", path.display()),
            Self::InputOpened { width, height } => {
                write!(f, "Input image opened ({width}x{height} px)")
            }
            Self::ResolutionDetected { dpi, source } => {
                write!(f, "Input image DPI: {dpi} ({source})")
            }
            Self::InputSize {
                width_cm,
                height_cm,
            } => write!(f, "Input image size: {width_cm:.2} x {height_cm:.2} cm"),
            Self::LayoutComputed { layout } => write!(
                f,
                "Pattern size: {}x{} px, repeat every {} px",
                layout.canvas_width, layout.canvas_height, layout.tile_size
            ),
            Self::ResizingTile { tile_size } => {
                write!(f, "Resizing input to {tile_size}x{tile_size} px tile...")
            }
            Self::AllocatingCanvas { width, height } => {
                write!(f, "Creating blank {width}x{height} px canvas...")
            }
            Self::TilePlaced { placed, total } => write!(f, "Placed tile {placed}/{total}"),
            Self::Enhancing => write!(f, "Enhancing quality and converting to CMYK..."),
            Self::Saving { path } => write!(f, "Saving final image to {}...", path.display()),
            Self::Saved { path } => write!(f, "Output image saved to {}", path.display()),
            Self::Failed { reason } => write!(f, "Error: {reason}"),
        }
    }
}

/// Receives progress events from a pattern run
pub trait ProgressReporter {
    /// Handle a single event
    fn report(&mut self, event: &ProgressEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&mut self, _event: &ProgressEvent) {}
}

impl<F> ProgressReporter for F
where
    F: FnMut(&ProgressEvent),
{
    fn report(&mut self, event: &ProgressEvent) {
        (*self)(event);
    }
}

/// Routes events through the `log` facade
///
/// Failures go to `error`, per-tile events to `trace`, everything else to `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Failed { .. } => log::error!("{event}"),
            ProgressEvent::TilePlaced { .. } => log::trace!("{event}"),
            _ => log::info!("{event}"),
        }
    }
}

static TILING_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "Tiling [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} tiles"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal reporter: one line per stage, a progress bar while tiling
pub struct ConsoleReporter {
    tiling_bar: Option<ProgressBar>,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleReporter {
    /// Create a console reporter with no active bar
    pub const fn new() -> Self {
        Self { tiling_bar: None }
    }

    fn finish_bar(&mut self) {
        if let Some(bar) = self.tiling_bar.take() {
            bar.finish_and_clear();
        }
    }

    // Allow print for user-facing stage narration
    #[allow(clippy::print_stdout)]
    fn print_line(event: &ProgressEvent) {
        println!("{event}");
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&mut self, event: &ProgressEvent) {
        if let ProgressEvent::TilePlaced { placed, total } = event {
            let bar = self.tiling_bar.get_or_insert_with(|| {
                let bar = ProgressBar::new(*total);
                bar.set_style(TILING_STYLE.clone());
                bar
            });
            bar.set_position(*placed);
            if placed >= total {
                self.finish_bar();
            }
            return;
        }

        self.finish_bar();
        Self::print_line(event);
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.finish_bar();
    }
}
