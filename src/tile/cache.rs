//! Query-scoped cache for decoded tiles.
//!
//! Several style layers usually share one source tile-layer (a fill and its
//! outline, for instance), and distinct source layers often live in the
//! same physical tile. Decoding an MVT tile is by far the most expensive
//! step of a query, so decoded tiles are memoized for the query's lifetime.
//!
//! # Cache key
//!
//! Entries are keyed by the full resolution parameters —
//! `(source_layer, zoom, x, y, scale)` — so a key fully determines its
//! value and correctness does not depend on call order.
//!
//! # Growth
//!
//! The cache is unbounded. Within one query that is bounded by the style's
//! layer count; callers that keep a cache alive across many queries own
//! the eviction policy.

use std::collections::HashMap;
use std::sync::Arc;

use crate::overzoom::ResolvedTile;

use super::codec::DecodedTile;

/// Cache key for decoded tiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileCacheKey {
    /// Source tile-layer the style layer asked for
    pub source_layer: String,

    /// Zoom of the tile actually fetched
    pub zoom: u8,

    pub x: u64,

    pub y: u64,

    /// Overzoom scale factor the tile will be rendered at
    pub scale: u32,
}

impl TileCacheKey {
    pub fn new(source_layer: impl Into<String>, resolved: &ResolvedTile) -> Self {
        Self {
            source_layer: source_layer.into(),
            zoom: resolved.zoom,
            x: resolved.x,
            y: resolved.y,
            scale: resolved.scale,
        }
    }
}

/// Memoization table for decoded tiles.
#[derive(Debug, Default)]
pub struct DecodedTileCache {
    entries: HashMap<TileCacheKey, Arc<DecodedTile>>,
}

impl DecodedTileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TileCacheKey) -> Option<Arc<DecodedTile>> {
        self.entries.get(key).cloned()
    }

    /// Store a decoded tile and return the shared handle.
    pub fn insert(&mut self, key: TileCacheKey, tile: DecodedTile) -> Arc<DecodedTile> {
        let tile = Arc::new(tile);
        self.entries.insert(key, Arc::clone(&tile));
        tile
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
