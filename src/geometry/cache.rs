//! Query-scoped caches for projected geometry and point distances.
//!
//! A feature is often tested against several style sublayers that share a
//! source layer (fill plus outline is the common case). Projection and
//! distance computation are pure, so both are memoized: geometry by
//! feature identity and projection parameters, distance additionally by
//! the query point.
//!
//! Both caches are unbounded; callers reusing them across queries own the
//! eviction policy.

use std::collections::HashMap;

use geo_types::{Geometry, Point};

use super::key::FeatureKey;
use super::project::Projection;

/// Cache key for projected geometry: feature identity plus every
/// projection parameter. `tile_size` is stored as raw bits so the key can
/// be hashed and compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectedGeometryKey {
    feature: FeatureKey,
    extent: u32,
    tile_size_bits: u64,
    scale: u32,
}

impl ProjectedGeometryKey {
    pub fn new(feature: FeatureKey, projection: &Projection) -> Self {
        Self {
            feature,
            extent: projection.extent,
            tile_size_bits: projection.tile_size.to_bits(),
            scale: projection.scale,
        }
    }
}

/// Cache key for a feature-to-query-point distance: the projection key
/// plus the query point itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DistanceKey {
    geometry: ProjectedGeometryKey,
    point_bits: (u64, u64),
}

impl DistanceKey {
    pub fn new(geometry: ProjectedGeometryKey, point: &Point<f64>) -> Self {
        Self {
            geometry,
            point_bits: (point.x().to_bits(), point.y().to_bits()),
        }
    }
}

/// Memoized projected geometries.
#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: HashMap<ProjectedGeometryKey, Geometry<f64>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ProjectedGeometryKey) -> Option<&Geometry<f64>> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: ProjectedGeometryKey, geometry: Geometry<f64>) {
        self.entries.insert(key, geometry);
    }

    /// Return the cached geometry, computing and storing it on a miss.
    pub fn get_or_insert_with(
        &mut self,
        key: ProjectedGeometryKey,
        compute: impl FnOnce() -> Geometry<f64>,
    ) -> &Geometry<f64> {
        self.entries.entry(key).or_insert_with(compute)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Memoized feature-to-point distances.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: HashMap<DistanceKey, f64>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DistanceKey) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: DistanceKey, distance: f64) {
        self.entries.insert(key, distance);
    }

    /// Return the cached distance, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: DistanceKey, compute: impl FnOnce() -> f64) -> f64 {
        *self.entries.entry(key).or_insert_with(compute)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::point;

    fn projection(scale: u32) -> Projection {
        Projection::new(4096, 256.0, scale)
    }

    #[test]
    fn test_geometry_cache_roundtrip() {
        let mut cache = GeometryCache::new();
        let key = ProjectedGeometryKey::new(FeatureKey::Id(1), &projection(1));

        assert!(cache.get(&key).is_none());
        cache.insert(key, point! { x: 1.0, y: 2.0 }.into());
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn test_projection_parameters_split_entries() {
        let mut cache = GeometryCache::new();
        let plain = ProjectedGeometryKey::new(FeatureKey::Id(1), &projection(1));
        let overzoomed = ProjectedGeometryKey::new(FeatureKey::Id(1), &projection(16));

        cache.insert(plain, point! { x: 1.0, y: 2.0 }.into());
        assert!(cache.get(&overzoomed).is_none());
    }

    #[test]
    fn test_distance_cache_keyed_by_query_point() {
        let mut cache = DistanceCache::new();
        let geometry_key = ProjectedGeometryKey::new(FeatureKey::Id(1), &projection(1));
        let here = DistanceKey::new(geometry_key, &Point::new(10.0, 20.0));
        let there = DistanceKey::new(geometry_key, &Point::new(10.0, 21.0));

        cache.insert(here, 4.2);
        assert_eq!(cache.get(&here), Some(4.2));
        assert!(cache.get(&there).is_none());
    }
}
