//! Geographic to tile-space coordinate mapping.
//!
//! This module projects a (latitude, longitude, zoom) triple into the
//! standard Web-Mercator / slippy-map tiling scheme. It produces both the
//! integer tile index and the continuous position within the tile grid,
//! which the query engine later converts into a pixel position inside the
//! fetched tile.

/// Web Mercator valid latitude range.
///
/// Latitudes outside this range (toward the poles) produce non-finite or
/// out-of-grid Y positions. Enforcing the range is the caller's
/// responsibility; [`locate`] does not check it.
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Highest zoom level the tile grid supports.
///
/// Bounds the `2^zoom` grid size (and the overzoom scale factor) so zoom
/// arithmetic cannot overflow. Real-world tile sets top out well below this.
pub const MAX_ZOOM: u8 = 30;

/// Position of a geographic point within the tile grid at a given zoom.
///
/// `tile_x`/`tile_y` are the integer tile index; `exact_x`/`exact_y` are
/// the continuous tile-unit coordinates, so that `exact_x - tile_x as f64`
/// is the fractional position of the point inside its tile (0.0 = west/north
/// edge, 1.0 = east/south edge).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePosition {
    /// X index of the containing tile (0 at the antimeridian, increasing east)
    pub tile_x: u64,

    /// Y index of the containing tile (0 at the north edge, increasing south)
    pub tile_y: u64,

    /// Continuous X position in tile units
    pub exact_x: f64,

    /// Continuous Y position in tile units
    pub exact_y: f64,
}

/// Project a geographic point onto the tile grid at `zoom`.
///
/// Uses the spherical Web-Mercator formula. Longitude may be any real
/// number and is wrapped into [-180, 180) before projection. Latitude must
/// lie strictly between the poles; values at or beyond ±90° yield a
/// non-finite `exact_y` (see [`MIN_LAT`]/[`MAX_LAT`] for the range in which
/// the result is also a valid tile index).
pub fn locate(lat: f64, lon: f64, zoom: u8) -> TilePosition {
    let n = (1u64 << zoom) as f64;
    let lon = wrap_longitude(lon);
    let lat_rad = lat.to_radians();

    let exact_x = n * (lon + 180.0) / 360.0;
    let exact_y =
        n * (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0;

    TilePosition {
        tile_x: exact_x.floor() as u64,
        tile_y: exact_y.floor() as u64,
        exact_x,
        exact_y,
    }
}

/// Wrap a longitude into [-180, 180).
fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_null_island_zoom_zero() {
        let pos = locate(0.0, 0.0, 0);
        assert_eq!(pos.tile_x, 0);
        assert_eq!(pos.tile_y, 0);
        assert_approx_eq!(pos.exact_x, 0.5);
        assert_approx_eq!(pos.exact_y, 0.5);
    }

    #[test]
    fn test_tile_index_within_grid_bounds() {
        let fixtures = [
            (48.8566, 2.3522),   // Paris
            (-33.8688, 151.2093), // Sydney
            (MAX_LAT, -179.999),
            (MIN_LAT, 179.999),
        ];
        for zoom in [0u8, 1, 5, 12, 18] {
            let n = 1u64 << zoom;
            for (lat, lon) in fixtures {
                let pos = locate(lat, lon, zoom);
                assert!(pos.tile_x < n, "x out of range at z{zoom} for {lat},{lon}");
                assert!(pos.tile_y < n, "y out of range at z{zoom} for {lat},{lon}");
            }
        }
    }

    #[test]
    fn test_longitude_wraps() {
        let direct = locate(10.0, -170.0, 4);
        let wrapped = locate(10.0, 190.0, 4);
        assert_eq!(direct.tile_x, wrapped.tile_x);
        assert_approx_eq!(direct.exact_x, wrapped.exact_x);
    }

    #[test]
    fn test_fraction_matches_index() {
        let pos = locate(48.8566, 2.3522, 13);
        assert_eq!(pos.tile_x, pos.exact_x.floor() as u64);
        assert_eq!(pos.tile_y, pos.exact_y.floor() as u64);
        assert!(pos.exact_x - pos.tile_x as f64 >= 0.0);
        assert!(pos.exact_x - (pos.tile_x as f64) < 1.0);
    }

    #[test]
    fn test_zoom_doubles_exact_position() {
        let z5 = locate(48.8566, 2.3522, 5);
        let z6 = locate(48.8566, 2.3522, 6);
        assert_approx_eq!(z6.exact_x, z5.exact_x * 2.0);
        assert_approx_eq!(z6.exact_y, z5.exact_y * 2.0);
    }
}
