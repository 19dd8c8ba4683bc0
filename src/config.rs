//! CLI argument types for the `tilequery` binary.
//!
//! Two subcommands:
//! - `query` runs a rendered-feature query against an archive and a style
//!   document and prints the hits as JSON;
//! - `info` prints an archive's metadata (bounds, center, vector layers).
//!
//! All options can also be set through environment variables with the
//! `TILEQUERY_` prefix.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::query::DEFAULT_BRUSH_SIZE;

/// tilequery - query rendered vector-map features at a point, offline.
#[derive(Parser, Debug)]
#[command(name = "tilequery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query the features a renderer would draw at a geographic point.
    Query(QueryArgs),

    /// Print archive metadata: bounds, center, and vector layers.
    Info(InfoArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Path to the PMTiles archive.
    #[arg(env = "TILEQUERY_ARCHIVE")]
    pub archive: PathBuf,

    /// Path to the style document (MapLibre-flavored JSON).
    #[arg(short, long, env = "TILEQUERY_STYLE")]
    pub style: PathBuf,

    /// Latitude of the query point in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the query point in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Zoom level to emulate (fractional values are truncated for tile
    /// addressing).
    #[arg(short, long)]
    pub zoom: f64,

    /// Brush radius in pixels for hit-testing points and lines.
    #[arg(long, default_value_t = DEFAULT_BRUSH_SIZE)]
    pub brush_size: f64,

    /// Rendered tile size in pixels.
    #[arg(long, default_value_t = 256.0)]
    pub tile_size: f64,

    /// Force a tile extent instead of each layer's declared one.
    #[arg(long)]
    pub tile_extent: Option<u32>,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

impl QueryArgs {
    /// Validate argument ranges that clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} out of range [-90, 90]", self.lat));
        }
        if self.zoom < 0.0 || !self.zoom.is_finite() {
            return Err(format!("zoom {} must be a non-negative number", self.zoom));
        }
        if self.zoom > f64::from(crate::coord::MAX_ZOOM) {
            return Err(format!(
                "zoom {} exceeds the maximum of {}",
                self.zoom,
                crate::coord::MAX_ZOOM
            ));
        }
        if self.brush_size < 0.0 {
            return Err(format!("brush size {} must be >= 0", self.brush_size));
        }
        if self.tile_size <= 0.0 {
            return Err(format!("tile size {} must be > 0", self.tile_size));
        }
        if self.tile_extent == Some(0) {
            return Err("tile extent must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the PMTiles archive.
    #[arg(env = "TILEQUERY_ARCHIVE")]
    pub archive: PathBuf,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}
