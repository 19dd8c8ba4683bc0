//! Projection from tile-local units into the tile's pixel frame.
//!
//! Decoded geometry lives in tile-extent units (0..extent, y pointing
//! north). A renderer draws the tile at `tile_size` pixels, top-left
//! origin, enlarged by the overzoom scale factor when the tile was fetched
//! at a coarser zoom than requested. Projection is the pure function that
//! moves both the feature geometry and the query point into that shared
//! pixel frame, so the hit test compares like with like.

use geo::MapCoords;
use geo_types::{Geometry, Point};

use crate::coord::TilePosition;
use crate::overzoom::ResolvedTile;

/// Pixel size a tile is rendered at, unless the caller overrides it.
pub const DEFAULT_TILE_SIZE: f64 = 256.0;

/// Parameters mapping one tile's local units to pixels.
///
/// Identical parameters produce bit-identical projections, which is what
/// makes projected geometry cacheable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Tile-extent units the geometry is encoded in
    pub extent: u32,

    /// Rendered tile size in pixels
    pub tile_size: f64,

    /// Overzoom scale factor (power of two >= 1)
    pub scale: u32,
}

impl Projection {
    pub fn new(extent: u32, tile_size: f64, scale: u32) -> Self {
        Self {
            extent,
            tile_size,
            scale,
        }
    }

    /// Units-to-pixels multiplier, overzoom included.
    fn factor(&self) -> f64 {
        (self.tile_size / f64::from(self.extent)) * f64::from(self.scale)
    }

    /// Pixel height/width of the rendered frame. An overzoomed tile is
    /// drawn enlarged, so the frame spans `tile_size * scale` pixels.
    fn frame(&self) -> f64 {
        self.tile_size * f64::from(self.scale)
    }

    /// Project tile-local geometry into the pixel frame.
    ///
    /// Scales every coordinate by [`factor`](Self::factor) about the
    /// origin, then mirrors the vertical axis about the rendered frame
    /// (`y' = frame - y`, which is `tile_size - y` without overzoom) to
    /// convert from north-up geometry to top-left-origin pixels.
    pub fn to_pixels(&self, geometry: &Geometry<f64>) -> Geometry<f64> {
        let factor = self.factor();
        let frame = self.frame();
        geometry.map_coords(|coord| (coord.x * factor, frame - coord.y * factor).into())
    }

    /// Pixel position of the query point inside the fetched tile.
    ///
    /// `position` is the continuous tile-grid position at the *requested*
    /// zoom; the fetched tile may be coarser. The position is mapped into
    /// the fetched tile's frame (division by the scale factor), made local
    /// to that tile, and blown up by the same scale factor the geometry is
    /// drawn with. Tile-grid y already increases southward, so no mirror is
    /// needed here — the result is directly in top-left-origin pixels.
    pub fn query_point(&self, position: &TilePosition, resolved: &ResolvedTile) -> Point<f64> {
        let scale = f64::from(resolved.scale);
        let local_x = position.exact_x / scale - resolved.x as f64;
        let local_y = position.exact_y / scale - resolved.y as f64;
        Point::new(
            local_x * self.tile_size * scale,
            local_y * self.tile_size * scale,
        )
    }
}
