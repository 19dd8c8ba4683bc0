//! Vector tile decoding and caching.
//!
//! [`codec`] turns raw archive bytes (optionally gzip-compressed MVT
//! protobuf) into a [`DecodedTile`]: per-layer feature lists with
//! tile-local geometry and JSON properties. [`cache`] memoizes decoded
//! tiles for the duration of a query so style layers that share a source
//! tile pay the decode cost once.

pub mod cache;
pub mod codec;

pub use cache::{DecodedTileCache, TileCacheKey};
pub use codec::{decode_tile, DecodedTile, Feature, LayerData, DEFAULT_EXTENT};
