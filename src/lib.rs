//! # tilequery
//!
//! Offline `queryRenderedFeatures` for PMTiles vector map archives.
//!
//! Given a tiled vector dataset, a MapLibre-flavored style document, and a
//! (latitude, longitude, zoom) query point, `tilequery` determines which
//! features — across all style layers — a client-side renderer would draw
//! under the cursor. It replicates style-driven visibility rules and
//! pixel-space hit-testing server-side, without ever rasterizing a map.
//!
//! ## Pipeline
//!
//! - [`coord`] - Web-Mercator projection onto the tile grid
//! - [`overzoom`] - fallback to coarser tiles beyond a layer's maxzoom
//! - [`archive`] - random-access tile sources (PMTiles, in-memory)
//! - [`tile`] - MVT decoding and the decoded-tile cache
//! - [`style`] - style document model, visibility rules, filter grammar
//! - [`geometry`] - pixel projection, hit-testing, feature identity
//! - [`query`] - the orchestrator driving all style layers
//! - [`config`] - CLI argument types for the `tilequery` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use tilequery::{PmtilesArchive, QueryEngine, QueryOptions, StyleDocument};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut archive = PmtilesArchive::open("data/map.pmtiles")?;
//!     let style = StyleDocument::from_json(&std::fs::read_to_string("style.json")?)?;
//!
//!     let engine = QueryEngine::new(
//!         QueryOptions::new(48.8566, 2.3522, 14.0).with_brush_size(2.0),
//!     );
//!     for hit in engine.query(&mut archive, &style)? {
//!         println!("{} on layer {}", hit.key, hit.layer_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error taxonomy
//!
//! Recoverable conditions are handled by skip-and-continue, never by
//! retrying: a missing tile or a source layer absent from a decoded tile
//! skips the affected style layer; a gzip failure treats the payload as
//! uncompressed; an unsupported filter operator matches nothing. Archive
//! access failures and undecodable tiles are fatal for the query.

pub mod archive;
pub mod config;
pub mod coord;
pub mod error;
pub mod geometry;
pub mod overzoom;
pub mod query;
pub mod style;
pub mod tile;

// Re-export commonly used types
pub use archive::{
    ArchiveBounds, ArchiveMetadata, MemoryArchive, PmtilesArchive, TileArchive, VectorLayerInfo,
};
pub use config::{Cli, Command, InfoArgs, QueryArgs};
pub use coord::{locate, TilePosition, MAX_ZOOM};
pub use error::{ArchiveError, DecodeError, QueryError};
pub use geometry::{
    distance_to_point, hit_test, DistanceCache, FeatureKey, FeatureKeyResolver, GeometryCache,
    Projection, DEFAULT_TILE_SIZE,
};
pub use overzoom::{resolve, ResolvedTile};
pub use query::{
    QueryCaches, QueryEngine, QueryOptions, RenderedFeature, RenderedFeatureSummary,
    DEFAULT_BRUSH_SIZE,
};
pub use style::{FilterExpr, LayerType, StyleDocument, StyleLayer};
pub use tile::{decode_tile, DecodedTile, DecodedTileCache, Feature, LayerData, TileCacheKey};
