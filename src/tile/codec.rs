//! MVT tile decoding.
//!
//! Adapts the `geozero` MVT types (prost-generated protobuf) into the
//! feature model the query engine works with. Decoding performs three
//! normalizations:
//!
//! 1. **Transparent gzip**: PMTiles archives commonly store gzip-compressed
//!    tiles. Decompression is attempted first; if it fails the bytes are
//!    treated as already uncompressed (not an error).
//! 2. **North-up geometry**: MVT stores coordinates with y increasing
//!    southward (screen convention). Decoded geometry is mirrored within
//!    the layer extent so the y axis points north, matching the convention
//!    the geometry projector expects.
//! 3. **JSON properties**: MVT tag key/value tables are resolved into a
//!    plain JSON object per feature, so style filters compare against the
//!    same value model the style document uses.
//!
//! A tile that is present but undecodable is a fatal error for the query:
//! dropping its features silently would hide a data-integrity problem.

use std::collections::HashMap;
use std::io::Read;

use flate2::read::GzDecoder;
use geo::MapCoords;
use geo_types::Geometry;
use geozero::mvt::{tile, Tile};
use geozero::ToGeo;
use prost::Message;
use serde_json::{Map, Number, Value};

use crate::error::DecodeError;

/// Extent assumed for layers that do not declare one.
pub const DEFAULT_EXTENT: u32 = 4096;

// =============================================================================
// Decoded Model
// =============================================================================

/// A single decoded vector feature, in tile-local coordinates.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Native feature id. Optional in MVT, and not guaranteed unique
    /// within a tile.
    pub id: Option<u64>,

    /// Geometry in tile-local units, bounded by the layer extent,
    /// y axis pointing north.
    pub geometry: Geometry<f64>,

    /// Feature properties as a JSON object.
    pub properties: Map<String, Value>,
}

/// All features of one tile layer.
#[derive(Debug, Clone)]
pub struct LayerData {
    /// Integer coordinate range of the layer's geometry (typically 4096).
    pub extent: u32,

    pub features: Vec<Feature>,
}

/// A fully decoded tile: tile-layer name to feature list.
#[derive(Debug, Clone, Default)]
pub struct DecodedTile {
    layers: HashMap<String, LayerData>,
}

impl DecodedTile {
    /// Look up a tile layer by name.
    pub fn layer(&self, name: &str) -> Option<&LayerData> {
        self.layers.get(name)
    }

    /// Names of the layers present in this tile.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode raw tile bytes into a [`DecodedTile`].
///
/// The input may be gzip-compressed; see the module docs for the
/// normalizations applied.
pub fn decode_tile(data: &[u8]) -> Result<DecodedTile, DecodeError> {
    let raw = gunzip_or_passthrough(data);
    let tile = Tile::decode(raw.as_slice())?;

    let mut layers = HashMap::with_capacity(tile.layers.len());
    for layer in &tile.layers {
        let extent = if layer.extent.unwrap_or(DEFAULT_EXTENT) == 0 {
            DEFAULT_EXTENT
        } else {
            layer.extent.unwrap_or(DEFAULT_EXTENT)
        };

        let mut features = Vec::with_capacity(layer.features.len());
        for feature in &layer.features {
            features.push(decode_feature(layer, feature, extent)?);
        }

        layers.insert(
            layer.name.clone(),
            LayerData { extent, features },
        );
    }

    Ok(DecodedTile { layers })
}

fn decode_feature(
    layer: &tile::Layer,
    feature: &tile::Feature,
    extent: u32,
) -> Result<Feature, DecodeError> {
    let geometry = feature
        .to_geo()
        .map_err(|e| DecodeError::Geometry {
            layer: layer.name.clone(),
            message: e.to_string(),
        })?;

    // MVT y axis points south; flip within the extent so north is up.
    let extent_f = f64::from(extent);
    let geometry = geometry.map_coords(|coord| (coord.x, extent_f - coord.y).into());

    Ok(Feature {
        id: feature.id,
        geometry,
        properties: decode_properties(layer, feature)?,
    })
}

fn decode_properties(
    layer: &tile::Layer,
    feature: &tile::Feature,
) -> Result<Map<String, Value>, DecodeError> {
    let mut properties = Map::new();
    for pair in feature.tags.chunks(2) {
        let [key_idx, value_idx] = pair else {
            return Err(DecodeError::TagOutOfBounds {
                layer: layer.name.clone(),
            });
        };
        let key = layer.keys.get(*key_idx as usize).ok_or_else(|| {
            DecodeError::TagOutOfBounds {
                layer: layer.name.clone(),
            }
        })?;
        let value = layer.values.get(*value_idx as usize).ok_or_else(|| {
            DecodeError::TagOutOfBounds {
                layer: layer.name.clone(),
            }
        })?;
        properties.insert(key.clone(), tag_value(value));
    }
    Ok(properties)
}

/// Convert an MVT tag value into JSON.
fn tag_value(value: &tile::Value) -> Value {
    if let Some(ref s) = value.string_value {
        Value::String(s.clone())
    } else if let Some(b) = value.bool_value {
        Value::Bool(b)
    } else if let Some(i) = value.int_value {
        Value::Number(Number::from(i))
    } else if let Some(i) = value.sint_value {
        Value::Number(Number::from(i))
    } else if let Some(u) = value.uint_value {
        Value::Number(Number::from(u))
    } else if let Some(d) = value.double_value {
        Number::from_f64(d).map(Value::Number).unwrap_or(Value::Null)
    } else if let Some(f) = value.float_value {
        Number::from_f64(f64::from(f))
            .map(Value::Number)
            .unwrap_or(Value::Null)
    } else {
        Value::Null
    }
}

/// Attempt gzip decompression; return the input unchanged if it is not a
/// gzip stream.
fn gunzip_or_passthrough(data: &[u8]) -> Vec<u8> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => out,
        Err(_) => data.to_vec(),
    }
}
