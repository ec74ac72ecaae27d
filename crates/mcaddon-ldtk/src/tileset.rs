//! Block data attached to tileset tiles.
//!
//! Each tile's custom data is a free-text blob; the converter reads three line
//! prefixes from it:
//!
//! ```text
//! id=minecraft:oak_stairs
//! origin=minecraft:stone
//! properties=weirdo_direction:2,upside_down_bit:false
//! ```

use std::collections::HashMap;

use mcaddon_world::{BlockProperty, BlockState};
use tracing::{debug, warn};

use crate::source::TilesetDef;

/// Block used when a tile does not name one.
pub const DEFAULT_BLOCK: &str = "minecraft:air";

/// `(tileset uid, tile id)`
pub type TileKey = (i64, i64);

/// The blocks placed for one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileData {
    /// Identifier of the block placed last.
    pub block: String,
    /// Identifier of the block placed first, underneath `block`.
    pub origin: String,
    /// Raw `key:value` state properties for `block`.
    pub properties: Vec<(String, String)>,
}

impl Default for TileData {
    fn default() -> Self {
        Self {
            block: DEFAULT_BLOCK.into(),
            origin: DEFAULT_BLOCK.into(),
            properties: Vec::new(),
        }
    }
}

impl TileData {
    /// Parse a custom-data blob. Unknown lines are ignored.
    pub fn parse(data: &str) -> Self {
        let mut tile = TileData::default();
        for line in data.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(id) = line.strip_prefix("id=") {
                tile.block = id.trim().to_string();
            } else if let Some(origin) = line.strip_prefix("origin=") {
                tile.origin = origin.trim().to_string();
            } else if let Some(props) = line.strip_prefix("properties=") {
                tile.properties = parse_properties(props);
            } else {
                debug!("Ignoring tile data line '{line}'");
            }
        }
        tile
    }
}

fn parse_properties(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter_map(|pair| match pair.split_once(':') {
            Some((key, value)) => Some((key.trim().to_string(), value.trim().to_string())),
            None => {
                warn!("Ignoring malformed block property '{pair}'");
                None
            }
        })
        .collect()
}

/// Build the `(tileset, tile) -> TileData` lookup for every tileset.
pub fn collect_tile_data(tilesets: &[TilesetDef]) -> HashMap<TileKey, TileData> {
    let mut lookup = HashMap::new();
    for tileset in tilesets {
        for entry in &tileset.custom_data {
            lookup.insert((tileset.uid, entry.tile_id), TileData::parse(&entry.data));
        }
        debug!(
            "Tileset '{}' ({}): {} tile(s) with custom data",
            tileset.identifier,
            tileset.uid,
            tileset.custom_data.len()
        );
    }
    lookup
}

/// Resolves block identifiers and raw properties to block states.
pub trait BlockCatalog {
    fn resolve(&self, identifier: &str, properties: &[(String, String)]) -> BlockState;
}

/// Takes identifiers at face value and types property values by their text.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierCatalog;

impl BlockCatalog for IdentifierCatalog {
    fn resolve(&self, identifier: &str, properties: &[(String, String)]) -> BlockState {
        properties
            .iter()
            .fold(BlockState::from_identifier(identifier), |block, (k, v)| {
                block.with_property(k, BlockProperty::parse(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TileCustomData;

    #[test]
    fn parse_all_prefixes() {
        let tile = TileData::parse(
            "id=minecraft:oak_stairs\norigin=minecraft:stone\nproperties=weirdo_direction:2, upside_down_bit:false",
        );
        assert_eq!(tile.block, "minecraft:oak_stairs");
        assert_eq!(tile.origin, "minecraft:stone");
        assert_eq!(
            tile.properties,
            vec![
                ("weirdo_direction".to_string(), "2".to_string()),
                ("upside_down_bit".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn unknown_lines_are_ignored() {
        let tile = TileData::parse("note=decorative\nid=glass\r\n");
        assert_eq!(tile.block, "glass");
        assert_eq!(tile.origin, DEFAULT_BLOCK);
    }

    #[test]
    fn empty_data_defaults() {
        assert_eq!(TileData::parse(""), TileData::default());
    }

    #[test]
    fn lookup_is_keyed_by_tileset_and_tile() {
        let tilesets = vec![
            TilesetDef {
                uid: 1,
                identifier: "A".into(),
                custom_data: vec![TileCustomData {
                    tile_id: 0,
                    data: "id=stone".into(),
                }],
            },
            TilesetDef {
                uid: 2,
                identifier: "B".into(),
                custom_data: vec![TileCustomData {
                    tile_id: 0,
                    data: "id=dirt".into(),
                }],
            },
        ];
        let lookup = collect_tile_data(&tilesets);
        assert_eq!(lookup[&(1, 0)].block, "stone");
        assert_eq!(lookup[&(2, 0)].block, "dirt");
        assert!(!lookup.contains_key(&(1, 1)));
    }

    #[test]
    fn catalog_types_properties() {
        let block = IdentifierCatalog.resolve(
            "oak_stairs",
            &[
                ("weirdo_direction".into(), "2".into()),
                ("upside_down_bit".into(), "true".into()),
            ],
        );
        assert_eq!(block.identifier(), "minecraft:oak_stairs");
        assert_eq!(
            block.properties.get("weirdo_direction"),
            Some(&BlockProperty::Int(2))
        );
        assert_eq!(
            block.properties.get("upside_down_bit"),
            Some(&BlockProperty::Byte(1))
        );
    }
}
