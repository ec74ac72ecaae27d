//! Voxel store error types.

use thiserror::Error;

use crate::block::Dimension;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("failed to open world at {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("database error: {0}")]
    Db(String),

    #[error("chunk ({cx}, {cz}) does not exist in the {dimension}")]
    ChunkNotFound {
        cx: i32,
        cz: i32,
        dimension: Dimension,
    },

    #[error("y = {y} is outside the build height of the {dimension}")]
    OutOfBounds { y: i32, dimension: Dimension },

    #[error("unsupported platform '{0}', only 'bedrock' is supported")]
    UnsupportedPlatform(String),

    #[error("corrupt sub-chunk data: {0}")]
    CorruptSubChunk(&'static str),

    #[error("block palette error: {0}")]
    Palette(#[from] serde_json::Error),
}
