//! Per-feature identity for deduplication and memoization.
//!
//! Tile features may lack a native id, and a tile may even reuse the same
//! id for distinct features. Within one query every feature still needs a
//! stable identity: it keys the projected-geometry and distance caches and
//! deduplicates hits across style layers.
//!
//! The fallback identity is a non-cryptographic hash over the geometry's
//! coordinates and the sorted property pairs. It is a best-effort
//! disambiguator for the current query only: two distinct features with
//! identical geometry and properties collide, which is acceptable (they are
//! indistinguishable at the attribute level), and the hash must never be
//! persisted or treated as a durable identifier.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};

use geo::CoordsIter;
use geo_types::Geometry;
use serde::Serialize;

use crate::tile::Feature;

/// Identity of a feature within one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FeatureKey {
    /// The feature's native id, first occurrence in this query
    Id(u64),

    /// Content hash fallback for features without a usable native id
    Fallback(u64),
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureKey::Id(id) => write!(f, "{id}"),
            FeatureKey::Fallback(hash) => write!(f, "#{hash:016x}"),
        }
    }
}

/// Assigns feature keys over the lifetime of one query.
///
/// The seen-id set is scoped to a single style layer's feature pass and
/// reset by [`begin_layer`](Self::begin_layer): within one pass a repeated
/// id marks *distinct* features sharing an id, which must not collide;
/// across style layers the *same* feature must keep resolving to the same
/// key, so that cross-layer deduplication and the geometry/distance caches
/// work.
#[derive(Debug, Default)]
pub struct FeatureKeyResolver {
    seen_ids: HashSet<u64>,
}

impl FeatureKeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new style layer's feature pass.
    pub fn begin_layer(&mut self) {
        self.seen_ids.clear();
    }

    /// Resolve a feature's key.
    ///
    /// A native id that has not been seen yet in the current pass is used
    /// as-is and marked seen. Features without an id, or repeating an
    /// already seen id, fall back to the content hash.
    pub fn resolve(&mut self, feature: &Feature) -> FeatureKey {
        if let Some(id) = feature.id {
            if self.seen_ids.insert(id) {
                return FeatureKey::Id(id);
            }
        }
        FeatureKey::Fallback(content_hash(feature))
    }
}

/// Non-cryptographic content hash over geometry and properties.
fn content_hash(feature: &Feature) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_geometry(&feature.geometry, &mut hasher);

    // Sort properties so insertion order cannot change the hash.
    let sorted: BTreeMap<&String, String> = feature
        .properties
        .iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    for (key, value) in sorted {
        key.hash(&mut hasher);
        value.hash(&mut hasher);
    }
    hasher.finish()
}

fn hash_geometry(geometry: &Geometry<f64>, hasher: &mut DefaultHasher) {
    kind_tag(geometry).hash(hasher);
    geometry.coords_count().hash(hasher);
    for coord in geometry.coords_iter() {
        coord.x.to_bits().hash(hasher);
        coord.y.to_bits().hash(hasher);
    }
}

fn kind_tag(geometry: &Geometry<f64>) -> u8 {
    match geometry {
        Geometry::Point(_) => 0,
        Geometry::Line(_) => 1,
        Geometry::LineString(_) => 2,
        Geometry::Polygon(_) => 3,
        Geometry::MultiPoint(_) => 4,
        Geometry::MultiLineString(_) => 5,
        Geometry::MultiPolygon(_) => 6,
        Geometry::GeometryCollection(_) => 7,
        Geometry::Rect(_) => 8,
        Geometry::Triangle(_) => 9,
    }
}
