//! Overzoom resolution.
//!
//! Vector archives rarely store tiles beyond a layer's declared maximum
//! zoom. When a query asks for a finer zoom than a style layer's data
//! provides, a renderer falls back to the coarsest available parent tile
//! and scales it up — "overzooming". This module decides which tile to
//! fetch and the pixel scale factor to apply.
//!
//! Only coarser-than-requested fallback is performed: the resolver never
//! substitutes a *finer* zoom than the one requested.

/// The tile actually fetched for a query, after overzoom resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedTile {
    /// Zoom level of the fetched tile
    pub zoom: u8,

    /// X index of the fetched tile at `zoom`
    pub x: u64,

    /// Y index of the fetched tile at `zoom`
    pub y: u64,

    /// Pixel scale factor to apply to the tile's content.
    ///
    /// Always a power of two >= 1; equal to 1 when no overzoom occurred.
    pub scale: u32,
}

/// Resolve which tile to fetch for a style layer.
///
/// `requested_zoom` is the (already truncated) integer zoom of the query
/// and `tile_x`/`tile_y` the target tile index at that zoom. If the
/// requested zoom exceeds `layer_maxzoom`, the layer's maximum zoom is
/// substituted, the scale factor becomes `2^(requested - max)`, and the
/// tile index is mapped down by integer division. Otherwise the request is
/// returned unchanged with scale 1.
///
/// Whether the archive actually holds a tile at the resolved coordinates
/// is a separate question, answered by the archive fetch.
pub fn resolve(requested_zoom: u8, layer_maxzoom: u8, tile_x: u64, tile_y: u64) -> ResolvedTile {
    if requested_zoom > layer_maxzoom {
        // Zoom spans are bounded by coord::MAX_ZOOM; the cap keeps the
        // shift defined for out-of-range callers.
        let levels = u32::from(requested_zoom - layer_maxzoom).min(u32::from(crate::coord::MAX_ZOOM));
        let scale = 1u32 << levels;
        ResolvedTile {
            zoom: layer_maxzoom,
            x: tile_x / scale as u64,
            y: tile_y / scale as u64,
            scale,
        }
    } else {
        ResolvedTile {
            zoom: requested_zoom,
            x: tile_x,
            y: tile_y,
            scale: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_or_below_maxzoom_is_identity() {
        for zoom in 0..=14u8 {
            let resolved = resolve(zoom, 14, 100, 200);
            assert_eq!(resolved.zoom, zoom);
            assert_eq!(resolved.x, 100);
            assert_eq!(resolved.y, 200);
            assert_eq!(resolved.scale, 1);
        }
    }

    #[test]
    fn test_overzoom_four_levels() {
        // Requesting z16 against a layer capped at z12: scale 16,
        // tile index divided by 16.
        let resolved = resolve(16, 12, 34000, 22000);
        assert_eq!(resolved.zoom, 12);
        assert_eq!(resolved.scale, 16);
        assert_eq!(resolved.x, 34000 / 16);
        assert_eq!(resolved.y, 22000 / 16);
    }

    #[test]
    fn test_scale_is_power_of_two() {
        for requested in 0..=24u8 {
            for maxzoom in 0..=24u8 {
                let resolved = resolve(requested, maxzoom, 1234, 5678);
                assert!(resolved.scale >= 1);
                assert!(resolved.scale.is_power_of_two());
                assert!(resolved.zoom <= maxzoom || resolved.scale == 1);
                assert!(resolved.zoom <= requested);
            }
        }
    }

    #[test]
    fn test_never_underzooms() {
        // A layer allowing finer zooms than requested must not change the tile.
        let resolved = resolve(8, 14, 10, 20);
        assert_eq!(resolved.zoom, 8);
        assert_eq!(resolved.scale, 1);
    }
}
