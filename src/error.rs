use thiserror::Error;

/// Errors that can occur when opening or reading a tile archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// I/O error while opening or reading the archive file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive container could not be parsed
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// The archive stores a tile type other than vector (MVT) tiles
    #[error("Unsupported tile type: expected MVT, archive contains {0}")]
    UnsupportedTileType(String),
}

/// Errors that can occur when decoding a vector tile.
///
/// All of these are fatal for the query that triggered the decode: a tile
/// that is present in the archive but cannot be decoded indicates a
/// data-integrity problem, and silently dropping its features would hide it.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The tile bytes are not a valid MVT protobuf message
    #[error("MVT protobuf error: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// A feature carries malformed geometry commands
    #[error("Malformed geometry in layer {layer:?}: {message}")]
    Geometry { layer: String, message: String },

    /// A feature's tag indices point outside the layer's key/value tables
    #[error("Tag index out of bounds in layer {layer:?}")]
    TagOutOfBounds { layer: String },
}

/// Errors surfaced by a rendered-feature query.
///
/// Absent tiles and absent source layers are *not* errors — the affected
/// style layer is skipped and the query proceeds. Only archive access
/// failures and undecodable tiles abort a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The archive reader failed
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// A fetched tile could not be decoded
    #[error("Tile decode error at z{zoom}/{x}/{y}: {source}")]
    Decode {
        zoom: u8,
        x: u64,
        y: u64,
        #[source]
        source: DecodeError,
    },
}
