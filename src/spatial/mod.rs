//! Spatial layout of the repeating pattern
//!
//! This module contains the tile grid arithmetic and the canvas fill that
//! pastes the prepared tile at every grid position.

/// Tile grid layout, tile preparation and canvas synthesis
pub mod tiling;

pub use tiling::TileGrid;
