//! Tile grid layout and canvas synthesis
//!
//! Tiles are pasted at integer multiples of the tile size starting at the
//! canvas origin. When the canvas is not an exact multiple of the tile, the
//! last row and column overhang the canvas and are clipped rather than
//! rescaled, so the canvas is always fully covered.

use crate::io::progress::{ProgressEvent, ProgressReporter};
use crate::math::PixelLayout;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Resampling filter for tile preparation (windowed sinc, a = 3)
pub const TILE_FILTER: FilterType = FilterType::Lanczos3;

/// Number of tile steps needed to cover `canvas_px`
///
/// A zero-sized tile covers nothing and yields zero steps.
pub const fn grid_steps(canvas_px: u32, tile_px: u32) -> u32 {
    if tile_px == 0 {
        return 0;
    }
    canvas_px.div_ceil(tile_px)
}

/// Grid of tile positions covering a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Horizontal step between tiles
    pub tile_width: u32,
    /// Vertical step between tiles
    pub tile_height: u32,
}

impl TileGrid {
    /// Grid for a canvas and tile of the given sizes
    pub const fn new(canvas: (u32, u32), tile: (u32, u32)) -> Self {
        Self {
            canvas_width: canvas.0,
            canvas_height: canvas.1,
            tile_width: tile.0,
            tile_height: tile.1,
        }
    }

    /// Grid for a square tile layout
    pub const fn from_layout(layout: &PixelLayout) -> Self {
        Self::new(layout.canvas(), (layout.tile_size, layout.tile_size))
    }

    /// Tiles per row
    pub const fn columns(&self) -> u32 {
        grid_steps(self.canvas_width, self.tile_width)
    }

    /// Tiles per column
    pub const fn rows(&self) -> u32 {
        grid_steps(self.canvas_height, self.tile_height)
    }

    /// Total number of tiles pasted
    pub const fn tile_count(&self) -> u64 {
        self.columns() as u64 * self.rows() as u64
    }

    /// Top-left corner of every tile, row by row from the origin
    pub fn positions(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
        let columns = self.columns();
        let (tile_width, tile_height) = (self.tile_width, self.tile_height);

        (0..self.rows()).flat_map(move |row| {
            (0..columns).map(move |column| (column * tile_width, row * tile_height))
        })
    }
}

/// Resample the source to a square tile with a high-quality filter
pub fn prepare_tile(source: &RgbImage, tile_size: u32) -> RgbImage {
    imageops::resize(source, tile_size, tile_size, TILE_FILTER)
}

/// Paste `tile` across a new black canvas of the given size
///
/// Reports a [`ProgressEvent::TilePlaced`] after every paste.
pub fn fill_canvas<R>(tile: &RgbImage, canvas: (u32, u32), reporter: &mut R) -> RgbImage
where
    R: ProgressReporter + ?Sized,
{
    let grid = TileGrid::new(canvas, tile.dimensions());
    let total = grid.tile_count();
    let mut pattern = RgbImage::new(canvas.0, canvas.1);

    for (placed, (x, y)) in (1..).zip(grid.positions()) {
        // Out-of-bounds portions of the tile are skipped by replace
        imageops::replace(&mut pattern, tile, i64::from(x), i64::from(y));
        reporter.report(&ProgressEvent::TilePlaced { placed, total });
    }

    pattern
}
