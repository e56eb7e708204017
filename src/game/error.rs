//! Error taxonomy for level construction.
//!
//! Authoring errors are caller mistakes detected while the catalog or grid is
//! being populated. Resolution errors come out of the autotiling pass and
//! carry enough context (cell, required corners) to fix the level source.
//! The per-tick read path (flow field, buoyancy) has no error type at all.

use thiserror::Error;

use crate::game::catalog::{CornerSignature, TerrainClass, TileId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthoringError {
    #[error("tile id {0} is already defined")]
    DuplicateId(TileId),
    #[error("tile {id} ({class:?}): invalid payload: {reason}")]
    InvalidPayload {
        id: TileId,
        class: TerrainClass,
        reason: String,
    },
    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[error("cell ({x}, {y}) already holds feature tile {tile} and the level has been resolved")]
    OccupiedFeature { x: i32, y: i32, tile: TileId },
    #[error("catalog is frozen, cannot define {0}")]
    CatalogFrozen(String),
    #[error("unknown tile id {0}")]
    UnknownTile(TileId),
    #[error("wang set '{0}' is already defined")]
    DuplicateWangSet(String),
    #[error("tile {0} already has a corner signature")]
    DuplicateWangTile(TileId),
    #[error("invalid corner signature in wang set '{set}': {reason}")]
    InvalidSignature { set: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no tile in wang set '{set}' matches required corners {signature} at cell ({x}, {y})")]
    UnresolvableSignature {
        x: i32,
        y: i32,
        set: String,
        signature: CornerSignature,
    },
    #[error("catalog must be frozen before resolving")]
    CatalogNotFrozen,
    #[error("unknown wang set index {0}")]
    UnknownWangSet(u16),
    #[error("boundary colour {color} is not declared in wang set '{set}'")]
    InvalidBoundaryColor { set: String, color: u8 },
}

/// Anything that can abort a level load.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("malformed level: {0}")]
    Malformed(String),
    #[error(transparent)]
    Authoring(#[from] AuthoringError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}
