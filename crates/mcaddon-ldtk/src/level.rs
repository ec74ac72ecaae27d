//! Levels flattened into tile and entity placements, in tile units.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ConvertError;
use crate::source::{EntityInstance, ExternalLevel, LayerInstance, LevelDef, GRID_SIZE};

/// Namespace of entities flagged `vanilla`.
pub const VANILLA_NAMESPACE: &str = "minecraft";

/// Entity field that marks a vanilla entity.
pub const VANILLA_FIELD: &str = "vanilla";

/// One tile to place. Coordinates are tile units relative to the level origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub x: f64,
    pub y: f64,
    pub tileset: i64,
    pub tile: i64,
}

/// One entity to export. Coordinates are tile units relative to the level origin.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPlacement {
    pub x: f64,
    pub y: f64,
    pub tileset: Option<i64>,
    /// `namespace:lowercased_name`
    pub identifier: String,
    /// Field name -> value, as found in the map.
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLevel {
    pub name: String,
    /// World origin in tile units.
    pub origin: (i32, i32),
    /// Size in tile units.
    pub size: (i32, i32),
    /// Layer (depth) index.
    pub layer: i32,
    /// Placements in processing order: last declared layer first.
    pub tiles: Vec<TilePlacement>,
    pub entities: Vec<EntityPlacement>,
}

/// Pixels to whole tiles, keeping the sign (floor division).
fn px_to_tiles(px: i64) -> i32 {
    px.div_euclid(GRID_SIZE) as i32
}

/// Flatten every level of a project. External level files are resolved
/// relative to `base_dir`.
pub fn collect_level_data(
    levels: &[LevelDef],
    base_dir: &Path,
    namespace: &str,
) -> Result<Vec<TileLevel>, ConvertError> {
    levels
        .iter()
        .map(|def| collect_level(def, base_dir, namespace))
        .collect()
}

fn collect_level(def: &LevelDef, base_dir: &Path, namespace: &str) -> Result<TileLevel, ConvertError> {
    let layers = match (&def.layer_instances, &def.external_rel_path) {
        (Some(layers), _) => layers.clone(),
        (None, Some(rel_path)) => load_external_layers(&base_dir.join(rel_path))?,
        (None, None) => return Err(ConvertError::MissingLayers(def.identifier.clone())),
    };

    let mut level = TileLevel {
        name: def.identifier.clone(),
        origin: (px_to_tiles(def.world_x), px_to_tiles(def.world_y)),
        size: (px_to_tiles(def.px_wid), px_to_tiles(def.px_hei)),
        layer: def.world_depth,
        tiles: Vec::new(),
        entities: Vec::new(),
    };

    for layer in layers.iter().rev() {
        collect_layer(&mut level, layer, namespace)?;
    }

    debug!(
        "Level '{}': origin {:?}, size {:?}, layer {}, {} tile(s), {} entit(ies)",
        level.name,
        level.origin,
        level.size,
        level.layer,
        level.tiles.len(),
        level.entities.len()
    );
    Ok(level)
}

fn load_external_layers(path: &Path) -> Result<Vec<LayerInstance>, ConvertError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    let external: ExternalLevel = serde_json::from_str(&contents)?;
    Ok(external.layer_instances.unwrap_or_default())
}

fn collect_layer(level: &mut TileLevel, layer: &LayerInstance, namespace: &str) -> Result<(), ConvertError> {
    let tiles = layer.auto_layer_tiles.iter().chain(&layer.grid_tiles);
    if !layer.auto_layer_tiles.is_empty() || !layer.grid_tiles.is_empty() {
        let tileset = layer
            .tileset_def_uid
            .ok_or_else(|| ConvertError::MissingTileset {
                level: level.name.clone(),
                layer: layer.identifier.clone(),
            })?;
        for tile in tiles {
            level.tiles.push(TilePlacement {
                x: tile.px[0] / GRID_SIZE as f64,
                y: tile.px[1] / GRID_SIZE as f64,
                tileset,
                tile: tile.t,
            });
        }
    }

    level.entities.extend(
        layer
            .entity_instances
            .iter()
            .map(|entity| entity_placement(entity, namespace)),
    );
    Ok(())
}

fn entity_placement(entity: &EntityInstance, namespace: &str) -> EntityPlacement {
    let fields: Map<String, Value> = entity
        .field_instances
        .iter()
        .map(|f| (f.identifier.clone(), f.value.clone()))
        .collect();

    let vanilla = fields
        .get(VANILLA_FIELD)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let namespace = if vanilla { VANILLA_NAMESPACE } else { namespace };

    EntityPlacement {
        x: entity.px[0] / GRID_SIZE as f64,
        y: entity.px[1] / GRID_SIZE as f64,
        tileset: entity.tile.as_ref().map(|t| t.tileset_uid),
        identifier: format!("{namespace}:{}", entity.identifier.to_lowercase()),
        fields,
    }
}
