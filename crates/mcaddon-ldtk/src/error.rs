//! Tile map conversion error types.

use thiserror::Error;

use mcaddon_world::WorldError;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported grid size {found}, tile maps must use a 16px grid")]
    GridSize { found: i64 },

    #[error("unsupported plane '{0}', expected one of \"xy\", \"yx\", \"xz\", \"zx\"")]
    UnsupportedPlane(String),

    #[error("no tile data for tile {tile} of tileset {tileset}")]
    MissingTileData { tileset: i64, tile: i64 },

    #[error("layer '{layer}' of level '{level}' has tiles but no tileset")]
    MissingTileset { level: String, layer: String },

    #[error("level '{0}' has neither inline layers nor an external level file")]
    MissingLayers(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tile map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    World(#[from] WorldError),
}

impl ConvertError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
