//! tilequery - query rendered vector-map features at a point, offline.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use tilequery::{
    Cli, Command, InfoArgs, PmtilesArchive, QueryArgs, QueryEngine, QueryOptions, StyleDocument,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Query(args) => run_query(args),
        Command::Info(args) => run_info(args),
    }
}

// =============================================================================
// Query Command
// =============================================================================

fn run_query(args: QueryArgs) -> ExitCode {
    if let Err(e) = args.validate() {
        error!("Invalid arguments: {}", e);
        return ExitCode::FAILURE;
    }

    let style_json = match std::fs::read_to_string(&args.style) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to read style {}: {}", args.style.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let style = match StyleDocument::from_json(&style_json) {
        Ok(style) => style,
        Err(e) => {
            error!("Failed to parse style {}: {}", args.style.display(), e);
            return ExitCode::FAILURE;
        }
    };
    debug!(layers = style.layers.len(), "style loaded");

    let mut archive = match PmtilesArchive::open(&args.archive) {
        Ok(archive) => archive,
        Err(e) => {
            error!("Failed to open archive {}: {}", args.archive.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut options = QueryOptions::new(args.lat, args.lon, args.zoom)
        .with_brush_size(args.brush_size)
        .with_tile_size(args.tile_size);
    if let Some(extent) = args.tile_extent {
        options = options.with_tile_extent(extent);
    }

    let engine = QueryEngine::new(options);
    let hits = match engine.query(&mut archive, &style) {
        Ok(hits) => hits,
        Err(e) => {
            error!("Query failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let summaries: Vec<_> = hits.iter().map(|hit| hit.summary()).collect();
    print_json(&summaries, args.pretty)
}

// =============================================================================
// Info Command
// =============================================================================

fn run_info(args: InfoArgs) -> ExitCode {
    let archive = match PmtilesArchive::open(&args.archive) {
        Ok(archive) => archive,
        Err(e) => {
            error!("Failed to open archive {}: {}", args.archive.display(), e);
            return ExitCode::FAILURE;
        }
    };

    print_json(archive.metadata(), args.pretty)
}

// =============================================================================
// Helpers
// =============================================================================

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> ExitCode {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
