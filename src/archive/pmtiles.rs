//! PMTiles-backed tile archive.
//!
//! Wraps the `pmtiles2` reader behind the [`TileArchive`] trait and exposes
//! the archive-level metadata a viewer needs before issuing queries: the
//! geographic bounds, their center, and the vector layers advertised in the
//! embedded TileJSON-style metadata.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use bytes::Bytes;
use pmtiles2::{PMTiles, TileType};
use serde::{Deserialize, Serialize};

use crate::error::ArchiveError;

use super::TileArchive;

/// Decimal places kept when reporting archive bounds.
const BOUNDS_PRECISION: i32 = 7;

// =============================================================================
// Metadata
// =============================================================================

/// Geographic bounding box of an archive, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArchiveBounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl ArchiveBounds {
    /// Center of the bounds as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.top - self.bottom) / 2.0 + self.bottom,
            (self.right - self.left) / 2.0 + self.left,
        )
    }
}

/// One entry of the archive's `vector_layers` metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorLayerInfo {
    pub id: String,
    #[serde(default)]
    pub minzoom: Option<u8>,
    #[serde(default)]
    pub maxzoom: Option<u8>,
}

/// Archive-level metadata, assembled from the PMTiles header and the
/// embedded JSON metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveMetadata {
    pub bounds: ArchiveBounds,
    /// Center of the bounds as `(lat, lon)`
    pub center: (f64, f64),
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub vector_layers: Vec<VectorLayerInfo>,
}

impl ArchiveMetadata {
    /// Ids of the vector layers advertised by the archive.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.vector_layers.iter().map(|l| l.id.as_str()).collect()
    }
}

// =============================================================================
// PmtilesArchive
// =============================================================================

/// A PMTiles archive loaded for tile lookups.
///
/// Tiles are returned exactly as stored; gzip-compressed tile payloads are
/// handled downstream by the tile codec. Only MVT archives are accepted —
/// raster archives cannot answer rendered-feature queries.
pub struct PmtilesArchive {
    inner: PMTiles<Cursor<Vec<u8>>>,
    metadata: ArchiveMetadata,
}

impl PmtilesArchive {
    /// Open a PMTiles file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::from_reader(&mut reader)
    }

    /// Read a PMTiles archive from any seekable byte source.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self, ArchiveError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let inner = PMTiles::from_reader(Cursor::new(bytes))
            .map_err(|e| ArchiveError::InvalidArchive(e.to_string()))?;

        if inner.tile_type != TileType::Mvt {
            return Err(ArchiveError::UnsupportedTileType(format!(
                "{:?}",
                inner.tile_type
            )));
        }

        let metadata = read_metadata(&inner);
        Ok(Self { inner, metadata })
    }

    /// Archive-level metadata (bounds, center, vector layers).
    pub fn metadata(&self) -> &ArchiveMetadata {
        &self.metadata
    }
}

impl TileArchive for PmtilesArchive {
    fn get_tile(&mut self, zoom: u8, x: u64, y: u64) -> Result<Option<Bytes>, ArchiveError> {
        let tile = self
            .inner
            .get_tile(x, y, zoom)
            .map_err(|e| ArchiveError::InvalidArchive(e.to_string()))?;
        Ok(tile.map(|data| Bytes::from(data.to_vec())))
    }
}

fn read_metadata<R>(inner: &PMTiles<R>) -> ArchiveMetadata {
    let bounds = ArchiveBounds {
        left: round_coord(inner.min_longitude),
        bottom: round_coord(inner.min_latitude),
        right: round_coord(inner.max_longitude),
        top: round_coord(inner.max_latitude),
    };

    let vector_layers = inner
        .meta_data
        .get("vector_layers")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    ArchiveMetadata {
        bounds,
        center: bounds.center(),
        min_zoom: inner.min_zoom,
        max_zoom: inner.max_zoom,
        vector_layers,
    }
}

fn round_coord(value: f64) -> f64 {
    let factor = 10f64.powi(BOUNDS_PRECISION);
    (value * factor).round() / factor
}
