//! The rendered-feature query orchestrator.
//!
//! [`QueryEngine`] ties the whole pipeline together. For every style layer
//! that references a source tile-layer it:
//!
//! 1. projects the query point onto the tile grid ([`crate::coord`]),
//! 2. resolves overzoom against the layer's maxzoom ([`crate::overzoom`]),
//! 3. fetches and decodes the tile through the decoded-tile cache
//!    ([`crate::archive`], [`crate::tile`]),
//! 4. prunes features with the layer's visibility rules and filter
//!    ([`crate::style`]),
//! 5. projects surviving geometry into pixels and hit-tests it against the
//!    query point ([`crate::geometry`]),
//! 6. deduplicates hits by feature key, first style layer wins.
//!
//! Absent tiles and absent source layers skip the style layer; archive
//! failures and undecodable tiles abort the query (see [`crate::error`]).
//!
//! The engine is synchronous and single-threaded. All memoization lives in
//! [`QueryCaches`]: freshly allocated per query by [`QueryEngine::query`],
//! or owned by the caller and passed to [`QueryEngine::query_with_caches`]
//! to amortize repeated queries against the same archive and style. Shared
//! caches are never locked — a caller that reuses them across threads must
//! synchronize externally, and also owns eviction (the caches only grow).

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::archive::TileArchive;
use crate::coord;
use crate::error::QueryError;
use crate::geometry::cache::{DistanceKey, ProjectedGeometryKey};
use crate::geometry::{
    distance_to_point, hit_test, DistanceCache, FeatureKey, FeatureKeyResolver, GeometryCache,
    Projection, DEFAULT_TILE_SIZE,
};
use crate::overzoom;
use crate::style::{FilterExpr, StyleDocument};
use crate::tile::{decode_tile, DecodedTileCache, Feature, TileCacheKey};

/// Default brush radius in pixels.
pub const DEFAULT_BRUSH_SIZE: f64 = 1.0;

// =============================================================================
// Options and Caches
// =============================================================================

/// Parameters of one rendered-feature query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Latitude of the query point in degrees, strictly between the poles
    pub lat: f64,

    /// Longitude of the query point in degrees (any real, wrapped)
    pub lon: f64,

    /// Desired zoom; fractional values are truncated for tile addressing
    pub zoom: f64,

    /// Pixel radius for hit-testing points and lines
    pub brush_size: f64,

    /// Rendered tile size in pixels
    pub tile_size: f64,

    /// Override for the tile extent. When `None` (the default) each
    /// layer's declared extent is used.
    pub tile_extent: Option<u32>,
}

impl QueryOptions {
    /// Options for a query at `(lat, lon, zoom)` with renderer defaults
    /// (1 px brush, 256 px tiles, per-layer extent).
    pub fn new(lat: f64, lon: f64, zoom: f64) -> Self {
        Self {
            lat,
            lon,
            zoom,
            brush_size: DEFAULT_BRUSH_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
            tile_extent: None,
        }
    }

    pub fn with_brush_size(mut self, brush_size: f64) -> Self {
        self.brush_size = brush_size;
        self
    }

    pub fn with_tile_size(mut self, tile_size: f64) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_tile_extent(mut self, tile_extent: u32) -> Self {
        self.tile_extent = Some(tile_extent);
        self
    }
}

/// The memoization state of one or more queries.
///
/// Every key schema carries all parameters that determine the cached
/// value, so a cache object may safely outlive a single query as long as
/// it keeps being used against the same archive contents.
#[derive(Debug, Default)]
pub struct QueryCaches {
    pub tiles: DecodedTileCache,
    pub geometry: GeometryCache,
    pub distances: DistanceCache,
}

impl QueryCaches {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Results
// =============================================================================

/// One feature a renderer would draw under the query point.
#[derive(Debug, Clone)]
pub struct RenderedFeature {
    /// Identity the feature was deduplicated under
    pub key: FeatureKey,

    /// Id of the style layer that first matched the feature
    pub layer_name: String,

    pub feature: Feature,
}

impl RenderedFeature {
    /// Geometry-stripped view of the result, convenient for transport.
    pub fn summary(&self) -> RenderedFeatureSummary {
        RenderedFeatureSummary {
            key: self.key,
            layer_name: self.layer_name.clone(),
            id: self.feature.id,
            properties: self.feature.properties.clone(),
        }
    }
}

/// A rendered feature without its geometry.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedFeatureSummary {
    pub key: FeatureKey,
    #[serde(rename = "layerName")]
    pub layer_name: String,
    pub id: Option<u64>,
    pub properties: Map<String, Value>,
}

// =============================================================================
// Query Engine
// =============================================================================

/// Executes rendered-feature queries against an archive and a style.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    options: QueryOptions,
}

impl QueryEngine {
    pub fn new(options: QueryOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Run the query with caches scoped to this call.
    pub fn query<A: TileArchive>(
        &self,
        archive: &mut A,
        style: &StyleDocument,
    ) -> Result<Vec<RenderedFeature>, QueryError> {
        let mut caches = QueryCaches::new();
        self.query_with_caches(archive, style, &mut caches)
    }

    /// Run the query against caller-owned caches.
    ///
    /// Results are returned in first-hit order: the order style layers are
    /// listed, with later layers never displacing an already found feature.
    pub fn query_with_caches<A: TileArchive>(
        &self,
        archive: &mut A,
        style: &StyleDocument,
        caches: &mut QueryCaches,
    ) -> Result<Vec<RenderedFeature>, QueryError> {
        let options = &self.options;
        let requested_zoom = options
            .zoom
            .clamp(0.0, f64::from(coord::MAX_ZOOM))
            .trunc() as u8;

        let mut results: IndexMap<FeatureKey, RenderedFeature> = IndexMap::new();
        let mut keys = FeatureKeyResolver::new();

        for layer in &style.layers {
            let Some(source_layer) = layer.source_layer.as_deref() else {
                continue;
            };
            if !layer.is_visible() {
                debug!(layer = %layer.id, "style layer hidden, skipping");
                continue;
            }

            let position = coord::locate(options.lat, options.lon, requested_zoom);
            let resolved =
                overzoom::resolve(requested_zoom, layer.maxzoom, position.tile_x, position.tile_y);

            let cache_key = TileCacheKey::new(source_layer, &resolved);
            let decoded = match caches.tiles.get(&cache_key) {
                Some(tile) => tile,
                None => {
                    let Some(bytes) = archive.get_tile(resolved.zoom, resolved.x, resolved.y)?
                    else {
                        debug!(
                            layer = %layer.id,
                            zoom = resolved.zoom,
                            x = resolved.x,
                            y = resolved.y,
                            "no tile in archive, skipping layer"
                        );
                        continue;
                    };
                    let tile = decode_tile(&bytes).map_err(|e| QueryError::Decode {
                        zoom: resolved.zoom,
                        x: resolved.x,
                        y: resolved.y,
                        source: e,
                    })?;
                    caches.tiles.insert(cache_key, tile)
                }
            };

            let Some(layer_data) = decoded.layer(source_layer) else {
                debug!(layer = %layer.id, source_layer, "source layer absent from tile");
                continue;
            };

            let filter = FilterExpr::compile(layer.filter.as_ref());
            keys.begin_layer();
            let extent = options.tile_extent.unwrap_or(layer_data.extent);
            let projection = Projection::new(extent, options.tile_size, resolved.scale);
            let query_px = projection.query_point(&position, &resolved);

            for feature in &layer_data.features {
                if !filter.matches(&feature.properties) {
                    continue;
                }

                let key = keys.resolve(feature);
                let geometry_key = ProjectedGeometryKey::new(key, &projection);
                let projected = caches
                    .geometry
                    .get_or_insert_with(geometry_key, || projection.to_pixels(&feature.geometry));

                let distance_key = DistanceKey::new(geometry_key, &query_px);
                let distance = caches
                    .distances
                    .get_or_insert_with(distance_key, || distance_to_point(projected, &query_px));

                if hit_test(projected, &query_px, options.brush_size, distance) {
                    results.entry(key).or_insert_with(|| RenderedFeature {
                        key,
                        layer_name: layer.id.clone(),
                        feature: feature.clone(),
                    });
                }
            }
        }

        debug!(hits = results.len(), "query complete");
        Ok(results.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = QueryOptions::new(48.0, 2.0, 14.0);
        assert_eq!(options.brush_size, DEFAULT_BRUSH_SIZE);
        assert_eq!(options.tile_size, DEFAULT_TILE_SIZE);
        assert!(options.tile_extent.is_none());
    }

    #[test]
    fn test_options_builders() {
        let options = QueryOptions::new(0.0, 0.0, 3.0)
            .with_brush_size(2.5)
            .with_tile_size(512.0)
            .with_tile_extent(8192);
        assert_eq!(options.brush_size, 2.5);
        assert_eq!(options.tile_size, 512.0);
        assert_eq!(options.tile_extent, Some(8192));
    }

    #[test]
    fn test_empty_style_yields_no_results() {
        let mut archive = crate::archive::MemoryArchive::new();
        let style = StyleDocument { layers: vec![] };
        let engine = QueryEngine::new(QueryOptions::new(0.0, 0.0, 0.0));

        let results = engine.query(&mut archive, &style).unwrap();
        assert!(results.is_empty());
    }
}
