//! LDtk project JSON structures (only the fields the converter reads).

use serde::Deserialize;

/// Grid size every tile map must use, in pixels.
pub const GRID_SIZE: i64 = 16;

/// Top-level `.ldtk` document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdtkProject {
    pub default_grid_size: i64,
    #[serde(default)]
    pub defs: Definitions,
    #[serde(default)]
    pub levels: Vec<LevelDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub tilesets: Vec<TilesetDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetDef {
    pub uid: i64,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub custom_data: Vec<TileCustomData>,
}

/// Free-text data attached to one tile of a tileset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileCustomData {
    pub tile_id: i64,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDef {
    pub identifier: String,
    #[serde(default)]
    pub world_x: i64,
    #[serde(default)]
    pub world_y: i64,
    #[serde(default)]
    pub px_wid: i64,
    #[serde(default)]
    pub px_hei: i64,
    #[serde(default)]
    pub world_depth: i32,
    /// Inline layers; `None` when levels are saved to separate files.
    #[serde(default)]
    pub layer_instances: Option<Vec<LayerInstance>>,
    #[serde(default)]
    pub external_rel_path: Option<String>,
}

/// A separately saved level file (`.ldtkl`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLevel {
    #[serde(default)]
    pub layer_instances: Option<Vec<LayerInstance>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerInstance {
    #[serde(rename = "__identifier", default)]
    pub identifier: String,
    #[serde(rename = "__tilesetDefUid", default)]
    pub tileset_def_uid: Option<i64>,
    #[serde(rename = "autoLayerTiles", default)]
    pub auto_layer_tiles: Vec<TileInstance>,
    #[serde(rename = "gridTiles", default)]
    pub grid_tiles: Vec<TileInstance>,
    #[serde(rename = "entityInstances", default)]
    pub entity_instances: Vec<EntityInstance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileInstance {
    /// Pixel position inside the level.
    pub px: [f64; 2],
    /// Tile id inside the layer's tileset.
    pub t: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityInstance {
    pub px: [f64; 2],
    #[serde(rename = "__identifier")]
    pub identifier: String,
    #[serde(rename = "__tile", default)]
    pub tile: Option<TileRect>,
    #[serde(rename = "fieldInstances", default)]
    pub field_instances: Vec<FieldInstance>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRect {
    pub tileset_uid: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldInstance {
    #[serde(rename = "__identifier")]
    pub identifier: String,
    #[serde(rename = "__value", default)]
    pub value: serde_json::Value,
}
