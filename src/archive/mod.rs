//! Tile archive access.
//!
//! This module defines the [`TileArchive`] trait, the seam between the
//! query engine and the container format that stores raw tile bytes. The
//! engine only ever needs random, read-only access by `(zoom, x, y)`;
//! everything container-specific (directories, clustering, internal
//! compression) stays behind the trait.
//!
//! Two implementations are provided:
//! - [`PmtilesArchive`] for PMTiles files on disk or in memory
//! - [`MemoryArchive`], a plain hash map, for tests and embedding

mod pmtiles;

use bytes::Bytes;

use crate::error::ArchiveError;

pub use pmtiles::{ArchiveBounds, ArchiveMetadata, PmtilesArchive, VectorLayerInfo};

// =============================================================================
// TileArchive Trait
// =============================================================================

/// Random-access, read-only source of raw tile bytes.
///
/// `Ok(None)` means the archive holds no tile at the given address; the
/// query engine treats that as "skip this style layer", never as an error.
/// The returned bytes are exactly as stored — callers must assume they may
/// still be gzip-compressed.
///
/// Takes `&mut self` so that implementations backed by a seeking reader
/// can be used without interior mutability. Multiple queries sharing one
/// archive concurrently must therefore synchronize externally.
pub trait TileArchive {
    /// Fetch the raw bytes of the tile at `(zoom, x, y)`, if present.
    fn get_tile(&mut self, zoom: u8, x: u64, y: u64) -> Result<Option<Bytes>, ArchiveError>;
}

// =============================================================================
// MemoryArchive
// =============================================================================

/// In-memory tile archive backed by a hash map.
///
/// Useful for tests and for embedding small, programmatically built tile
/// sets without going through a container file.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    tiles: std::collections::HashMap<(u8, u64, u64), Bytes>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tile, replacing any previous tile at the same address.
    pub fn insert(&mut self, zoom: u8, x: u64, y: u64, data: impl Into<Bytes>) {
        self.tiles.insert((zoom, x, y), data.into());
    }

    /// Number of stored tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileArchive for MemoryArchive {
    fn get_tile(&mut self, zoom: u8, x: u64, y: u64) -> Result<Option<Bytes>, ArchiveError> {
        Ok(self.tiles.get(&(zoom, x, y)).cloned())
    }
}
