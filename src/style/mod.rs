//! Style document model and layer visibility rules.
//!
//! A style document is the MapLibre-flavored JSON a renderer is configured
//! with. The query engine consumes it read-only: it walks `layers` in
//! order, resolves each layer's source tile-layer, and applies the layer's
//! visibility switches and filter expression to decide which features a
//! renderer would actually draw.
//!
//! Only the parts the engine needs are modeled. Everything else in the
//! document (sources, sprites, glyphs, unknown paint keys) is carried as
//! opaque JSON or ignored; malformed values degrade to the renderer
//! defaults instead of failing the whole document.

pub mod filter;

use serde::Deserialize;
use serde_json::{Map, Value};

pub use filter::FilterExpr;

/// Default style-layer zoom range.
pub const DEFAULT_MINZOOM: u8 = 0;
pub const DEFAULT_MAXZOOM: u8 = 24;

// =============================================================================
// Document Types
// =============================================================================

/// A parsed style document: an ordered sequence of style layers.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleDocument {
    #[serde(default)]
    pub layers: Vec<StyleLayer>,
}

impl StyleDocument {
    /// Parse a style document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Rendering type of a style layer.
///
/// Unknown types deserialize to [`LayerType::Other`]; they stay visible
/// (no opacity rule applies) and hit-test like any other layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Fill,
    Line,
    Symbol,
    #[serde(other)]
    Other,
}

impl Default for LayerType {
    fn default() -> Self {
        LayerType::Other
    }
}

/// One style layer: a named rendering rule bound to a source tile-layer.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleLayer {
    #[serde(default)]
    pub id: String,

    /// Name of the tile layer this style layer draws from. Style layers
    /// without one (background layers, for instance) are skipped entirely.
    #[serde(rename = "source-layer", default)]
    pub source_layer: Option<String>,

    #[serde(rename = "type", default)]
    pub layer_type: LayerType,

    #[serde(default = "default_minzoom")]
    pub minzoom: u8,

    #[serde(default = "default_maxzoom")]
    pub maxzoom: u8,

    #[serde(default)]
    pub paint: Map<String, Value>,

    #[serde(default)]
    pub layout: Map<String, Value>,

    /// Raw filter expression; compiled with [`FilterExpr::compile`] before
    /// features are evaluated.
    #[serde(default)]
    pub filter: Option<Value>,
}

fn default_minzoom() -> u8 {
    DEFAULT_MINZOOM
}

fn default_maxzoom() -> u8 {
    DEFAULT_MAXZOOM
}

// =============================================================================
// Visibility
// =============================================================================

impl StyleLayer {
    /// Whether a renderer would draw this layer at all.
    ///
    /// A layer is invisible if `layout.visibility` is set to anything other
    /// than `"visible"`, or if its type-specific opacity is exactly zero
    /// (`fill-opacity` for fill layers, `line-opacity` for line layers,
    /// both `icon-opacity` and `text-opacity` for symbol layers).
    /// Non-numeric opacity values (expressions, malformed entries) fall
    /// back to fully opaque.
    ///
    /// The layer's minzoom/maxzoom range is intentionally *not* consulted:
    /// the renderer this engine mirrors draws features from any tile it has
    /// fetched, regardless of the style layer's zoom range.
    pub fn is_visible(&self) -> bool {
        if let Some(visibility) = self.layout.get("visibility").and_then(Value::as_str) {
            if visibility != "visible" {
                return false;
            }
        }

        match self.layer_type {
            LayerType::Fill => self.opacity("fill-opacity") != 0.0,
            LayerType::Line => self.opacity("line-opacity") != 0.0,
            LayerType::Symbol => {
                self.opacity("icon-opacity") != 0.0 || self.opacity("text-opacity") != 0.0
            }
            LayerType::Other => true,
        }
    }

    fn opacity(&self, key: &str) -> f64 {
        self.paint.get(key).and_then(Value::as_f64).unwrap_or(1.0)
    }
}
