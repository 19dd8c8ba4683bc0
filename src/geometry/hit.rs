//! Spatial hit-testing in the pixel frame.
//!
//! Mirrors how a renderer decides whether the cursor touches a feature:
//! thin geometry (points and lines) is tested with a brush radius, areal
//! geometry with plain containment. Both the geometry and the query point
//! must already be projected into the same pixel frame (see
//! [`super::project`]).

use geo::{Contains, EuclideanDistance};
use geo_types::{Geometry, Point};

/// Planar Euclidean distance from a geometry to a point, in pixels.
///
/// For multi-part geometry the minimum over the parts is returned; for
/// areal geometry the distance to the boundary, or 0 when the point is
/// inside. An empty multi-part geometry has infinite distance.
pub fn distance_to_point(geometry: &Geometry<f64>, point: &Point<f64>) -> f64 {
    match geometry {
        Geometry::Point(g) => g.euclidean_distance(point),
        Geometry::MultiPoint(g) => g
            .iter()
            .map(|p| p.euclidean_distance(point))
            .fold(f64::INFINITY, f64::min),
        Geometry::Line(g) => g.euclidean_distance(point),
        Geometry::LineString(g) => g.euclidean_distance(point),
        Geometry::MultiLineString(g) => g
            .iter()
            .map(|ls| ls.euclidean_distance(point))
            .fold(f64::INFINITY, f64::min),
        Geometry::Polygon(g) => g.euclidean_distance(point),
        Geometry::MultiPolygon(g) => g
            .iter()
            .map(|p| p.euclidean_distance(point))
            .fold(f64::INFINITY, f64::min),
        Geometry::Rect(g) => g.to_polygon().euclidean_distance(point),
        Geometry::Triangle(g) => g.to_polygon().euclidean_distance(point),
        Geometry::GeometryCollection(g) => g
            .iter()
            .map(|member| distance_to_point(member, point))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Whether a feature at `distance` pixels from the query point counts as
/// rendered under it.
///
/// Points and lines hit when the distance is strictly below the brush
/// radius. Polygons — and, conservatively, every other geometry kind — hit
/// when the point is contained; the brush radius does not widen areal
/// geometry. Containment follows geo's `Contains`: a point exactly on the
/// boundary is *not* contained.
pub fn hit_test(
    geometry: &Geometry<f64>,
    point: &Point<f64>,
    brush_size: f64,
    distance: f64,
) -> bool {
    match geometry {
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Line(_)
        | Geometry::LineString(_)
        | Geometry::MultiLineString(_) => distance < brush_size,
        _ => geometry.contains(point),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use geo_types::{line_string, point, polygon, MultiLineString};

    #[test]
    fn test_point_at_query_point_hits_for_any_positive_brush() {
        let geometry: Geometry<f64> = point! { x: 10.0, y: 10.0 }.into();
        let query = Point::new(10.0, 10.0);
        let distance = distance_to_point(&geometry, &query);

        assert_approx_eq!(distance, 0.0);
        assert!(hit_test(&geometry, &query, 0.001, distance));
        assert!(hit_test(&geometry, &query, 1.0, distance));
    }

    #[test]
    fn test_point_at_exact_brush_distance_misses() {
        // Strict inequality: distance == brush is not a hit.
        let geometry: Geometry<f64> = point! { x: 10.0, y: 10.0 }.into();
        let query = Point::new(13.0, 14.0); // distance 5
        let distance = distance_to_point(&geometry, &query);

        assert_approx_eq!(distance, 5.0);
        assert!(!hit_test(&geometry, &query, 5.0, distance));
        assert!(hit_test(&geometry, &query, 5.1, distance));
    }

    #[test]
    fn test_line_distance_is_perpendicular() {
        let geometry: Geometry<f64> =
            line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)].into();
        let query = Point::new(5.0, 2.0);
        let distance = distance_to_point(&geometry, &query);

        assert_approx_eq!(distance, 2.0);
        assert!(!hit_test(&geometry, &query, 2.0, distance));
        assert!(hit_test(&geometry, &query, 3.0, distance));
    }

    #[test]
    fn test_multi_line_takes_nearest_part() {
        let geometry: Geometry<f64> = MultiLineString::new(vec![
            line_string![(x: 0.0, y: 100.0), (x: 10.0, y: 100.0)],
            line_string![(x: 0.0, y: 1.0), (x: 10.0, y: 1.0)],
        ])
        .into();
        let query = Point::new(5.0, 0.0);

        assert_approx_eq!(distance_to_point(&geometry, &query), 1.0);
    }

    #[test]
    fn test_polygon_interior_hits_regardless_of_brush() {
        let geometry: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]
        .into();
        let inside = Point::new(5.0, 5.0);
        let distance = distance_to_point(&geometry, &inside);

        assert!(hit_test(&geometry, &inside, 0.0, distance));
        assert!(hit_test(&geometry, &inside, 100.0, distance));
    }

    #[test]
    fn test_polygon_boundary_point_misses() {
        // Pins the containment primitive's boundary convention: a point on
        // the edge is not contained, hence not a hit.
        let geometry: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]
        .into();
        let boundary = Point::new(10.0, 5.0);
        let distance = distance_to_point(&geometry, &boundary);

        assert!(!hit_test(&geometry, &boundary, 100.0, distance));
    }

    #[test]
    fn test_polygon_outside_misses_even_close_by() {
        // The brush radius does not widen areal geometry.
        let geometry: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]
        .into();
        let outside = Point::new(10.5, 5.0);
        let distance = distance_to_point(&geometry, &outside);

        assert_approx_eq!(distance, 0.5);
        assert!(!hit_test(&geometry, &outside, 5.0, distance));
    }
}
