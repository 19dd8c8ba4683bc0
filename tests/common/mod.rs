//! Shared fixtures for integration tests.
//!
//! Tiles are built with the `mvt` crate in raw MVT coordinates (tile-extent
//! units, y increasing downward from the top-left corner). PMTiles archives
//! are assembled in memory with `pmtiles2` and gzip tile payloads, the same
//! layout real tile pipelines produce.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use mvt::{GeomData, GeomEncoder, GeomType, Tile};
use pmtiles2::util::tile_id;
use pmtiles2::{Compression as PmtilesCompression, PMTiles, TileType};

use tilequery::StyleDocument;

pub const EXTENT: u32 = 4096;

// =============================================================================
// Tile Fixtures
// =============================================================================

/// Geometry of one fixture feature, in raw MVT coordinates (y-down).
pub enum Shape {
    Point(f64, f64),
    Line(Vec<(f64, f64)>),
    /// Closed exterior ring of a polygon.
    Ring(Vec<(f64, f64)>),
}

pub struct FeatureFixture {
    pub id: Option<u64>,
    pub shape: Shape,
    pub tags: Vec<(&'static str, &'static str)>,
}

impl FeatureFixture {
    pub fn new(shape: Shape) -> Self {
        Self {
            id: None,
            shape,
            tags: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_tag(mut self, key: &'static str, value: &'static str) -> Self {
        self.tags.push((key, value));
        self
    }
}

/// Encode an uncompressed MVT tile with the given layers.
pub fn build_tile(layers: Vec<(&str, Vec<FeatureFixture>)>) -> Vec<u8> {
    let mut tile = Tile::new(EXTENT);
    for (name, features) in layers {
        let mut layer = tile.create_layer(name);
        for fixture in features {
            let geom_data = encode_shape(&fixture.shape);
            let mut feature = layer.into_feature(geom_data);
            if let Some(id) = fixture.id {
                feature.set_id(id);
            }
            for (key, value) in &fixture.tags {
                feature.add_tag_string(key, value);
            }
            layer = feature.into_layer();
        }
        tile.add_layer(layer).unwrap();
    }
    tile.to_bytes().unwrap()
}

fn encode_shape(shape: &Shape) -> GeomData {
    match shape {
        Shape::Point(x, y) => GeomEncoder::new(GeomType::Point)
            .point(*x, *y)
            .unwrap()
            .encode()
            .unwrap(),
        Shape::Line(points) => {
            let mut encoder = GeomEncoder::new(GeomType::Linestring);
            for (x, y) in points {
                encoder = encoder.point(*x, *y).unwrap();
            }
            encoder.encode().unwrap()
        }
        Shape::Ring(points) => {
            let mut encoder = GeomEncoder::new(GeomType::Polygon);
            for (x, y) in points {
                encoder = encoder.point(*x, *y).unwrap();
            }
            encoder.complete().unwrap().encode().unwrap()
        }
    }
}

// =============================================================================
// Archive Fixtures
// =============================================================================

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Serialize a PMTiles archive holding the given tiles, gzip-compressed,
/// with fixed test bounds (-1..1 degrees) and a `vector_layers` entry for
/// `roads` and `water`.
pub fn build_archive(tiles: Vec<(u8, u64, u64, Vec<u8>)>) -> Vec<u8> {
    let mut pm = PMTiles::new(TileType::Mvt, PmtilesCompression::GZip);
    pm.min_zoom = 0;
    pm.max_zoom = 14;
    pm.min_longitude = -1.0;
    pm.min_latitude = -1.0;
    pm.max_longitude = 1.0;
    pm.max_latitude = 1.0;
    pm.center_longitude = 0.0;
    pm.center_latitude = 0.0;
    pm.meta_data.insert(
        "vector_layers".into(),
        serde_json::json!([
            {"id": "roads", "minzoom": 0, "maxzoom": 14},
            {"id": "water"}
        ]),
    );

    for (zoom, x, y, data) in tiles {
        pm.add_tile(tile_id(zoom, x, y), gzip(&data)).unwrap();
    }

    let mut cursor = Cursor::new(Vec::new());
    pm.to_writer(&mut cursor).unwrap();
    cursor.into_inner()
}

// =============================================================================
// Style Fixtures
// =============================================================================

/// Parse a style document from a JSON array of layers.
pub fn style(layers: serde_json::Value) -> StyleDocument {
    let document = serde_json::json!({ "version": 8, "layers": layers });
    StyleDocument::from_json(&document.to_string()).unwrap()
}
