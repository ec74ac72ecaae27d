//! LDtk project to Bedrock world conversion.
//!
//! The pipeline is strictly sequential: load (grid check, tile data, levels),
//! resolve every placement, prepare chunks, write blocks, write the entity
//! manifest, close the store. Any error stops the run before the store is
//! touched if it can be detected up front.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use mcaddon_world::chunk::chunk_coord;
use mcaddon_world::{BlockState, LevelDbWorld, VoxelStore, WorldError};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::config::{ConvertOptions, ConverterConfig};
use crate::coords::{map_coordinates, WorldPos};
use crate::error::ConvertError;
use crate::level::{collect_level_data, TileLevel};
use crate::source::{LdtkProject, GRID_SIZE};
use crate::tileset::{collect_tile_data, BlockCatalog, IdentifierCatalog, TileData, TileKey};

/// Destination for generated script sources.
pub trait ScriptSink {
    fn write_script(&mut self, file_name: &str, source: &str) -> Result<(), ConvertError>;
}

/// Writes scripts into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct ScriptDirectory {
    root: PathBuf,
}

impl ScriptDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ScriptSink for ScriptDirectory {
    fn write_script(&mut self, file_name: &str, source: &str) -> Result<(), ConvertError> {
        std::fs::create_dir_all(&self.root).map_err(|e| ConvertError::io(&self.root, e))?;
        let path = self.root.join(file_name);
        std::fs::write(&path, source).map_err(|e| ConvertError::io(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Counts from a finished conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub levels: usize,
    pub chunks_created: usize,
    pub tiles: usize,
    pub entities: usize,
}

/// A resolved tile placement: origin block then block, at one position.
struct BlockWrite {
    pos: WorldPos,
    origin: BlockState,
    block: BlockState,
}

pub struct TileWorldConverter<C: BlockCatalog = IdentifierCatalog> {
    levels: Vec<TileLevel>,
    tiles: HashMap<TileKey, TileData>,
    catalog: C,
}

impl TileWorldConverter<IdentifierCatalog> {
    /// Load an `.ldtk` project file.
    pub fn load(path: &Path, namespace: &str) -> Result<Self, ConvertError> {
        Self::load_with_catalog(path, namespace, IdentifierCatalog)
    }
}

impl<C: BlockCatalog> TileWorldConverter<C> {
    pub fn load_with_catalog(path: &Path, namespace: &str, catalog: C) -> Result<Self, ConvertError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse_with_catalog(&contents, base_dir, namespace, catalog)
    }

    /// Parse a project document. External level files resolve against `base_dir`.
    pub fn parse_with_catalog(
        contents: &str,
        base_dir: &Path,
        namespace: &str,
        catalog: C,
    ) -> Result<Self, ConvertError> {
        let document: Value = serde_json::from_str(contents)?;
        let grid_size = document
            .get("defaultGridSize")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if grid_size != GRID_SIZE {
            return Err(ConvertError::GridSize { found: grid_size });
        }

        let project: LdtkProject = serde_json::from_value(document)?;
        let tiles = collect_tile_data(&project.defs.tilesets);
        let levels = collect_level_data(&project.levels, base_dir, namespace)?;

        info!(
            "Loaded tile map ({} tileset(s), {} tile definition(s), {} level(s))",
            project.defs.tilesets.len(),
            tiles.len(),
            levels.len()
        );
        Ok(Self {
            levels,
            tiles,
            catalog,
        })
    }

    pub fn levels(&self) -> &[TileLevel] {
        &self.levels
    }

    pub fn tile_data(&self, tileset: i64, tile: i64) -> Option<&TileData> {
        self.tiles.get(&(tileset, tile))
    }

    /// Optionally clear the dimension, then create every chunk the levels cover.
    ///
    /// Returns the number of chunks created.
    pub fn prepare_level<S: VoxelStore>(
        &self,
        store: &mut S,
        options: &ConvertOptions,
    ) -> Result<usize, ConvertError> {
        let dim = options.dimension;
        if options.clear {
            let existing = store.all_chunk_coords(dim)?;
            warn!("Clearing {} chunk(s) from the {dim}", existing.len());
            for (cx, cz) in existing {
                store.delete_chunk(cx, cz, dim)?;
            }
        }

        let mut created = 0;
        for level in &self.levels {
            for (cx, cz) in footprint_chunks(level, options) {
                store.create_chunk(cx, cz, dim)?;
                created += 1;
            }
        }
        debug!("Prepared {created} chunk(s)");
        Ok(created)
    }

    /// Place every tile into `store`, write the entity manifest through
    /// `scripts` and close the store.
    pub fn convert<S: VoxelStore>(
        &self,
        mut store: S,
        options: &ConvertOptions,
        scripts: &mut dyn ScriptSink,
    ) -> Result<ConversionReport, ConvertError> {
        let writes = self.resolve_tiles(options)?;
        let chunks_created = self.prepare_level(&mut store, options)?;

        for write in &writes {
            let WorldPos { x, y, z } = write.pos;
            store.set_version_block(x, y, z, options.dimension, &options.version, &write.origin)?;
            store.set_version_block(x, y, z, options.dimension, &options.version, &write.block)?;
        }

        let mut entities = 0;
        if options.export_entities {
            let manifest = self.entity_manifest(options);
            entities = manifest
                .values()
                .filter_map(Value::as_array)
                .map(Vec::len)
                .sum();
            let source = format!(
                "// Generated from an LDtk project, do not edit.\nexport const {} = {};\n",
                options.export_name,
                serde_json::to_string_pretty(&manifest)?
            );
            scripts.write_script(&options.file_name, &source)?;
        }

        store.close()?;

        let report = ConversionReport {
            levels: self.levels.len(),
            chunks_created,
            tiles: writes.len(),
            entities,
        };
        info!(
            "Converted {} level(s) onto the {} plane: {} tile(s), {} entit(ies), {} chunk(s) prepared",
            report.levels, options.plane, report.tiles, report.entities, report.chunks_created
        );
        Ok(report)
    }

    /// Map and resolve every tile placement without touching the store.
    ///
    /// Fails on anything the store would reject later (platform, build height),
    /// so a failing run never clears or partially writes the world.
    fn resolve_tiles(&self, options: &ConvertOptions) -> Result<Vec<BlockWrite>, ConvertError> {
        if options.version.platform != "bedrock" {
            return Err(WorldError::UnsupportedPlatform(options.version.platform.clone()).into());
        }
        let dimension = options.dimension;
        let build_height = dimension.min_y()..dimension.max_y();

        let mut writes = Vec::new();
        for level in &self.levels {
            for tile in &level.tiles {
                let data = self.tile_data(tile.tileset, tile.tile).ok_or(
                    ConvertError::MissingTileData {
                        tileset: tile.tileset,
                        tile: tile.tile,
                    },
                )?;
                let pos = map_coordinates(
                    level.origin,
                    (tile.x, tile.y),
                    level.layer,
                    options.offset,
                    options.plane,
                );
                if !build_height.contains(&pos.y) {
                    return Err(WorldError::OutOfBounds { y: pos.y, dimension }.into());
                }
                writes.push(BlockWrite {
                    pos,
                    origin: self.catalog.resolve(&data.origin, &[]),
                    block: self.catalog.resolve(&data.block, &data.properties),
                });
            }
        }
        Ok(writes)
    }

    /// Level name -> ordered list of `{identifier, location, fields}`.
    fn entity_manifest(&self, options: &ConvertOptions) -> Map<String, Value> {
        let mut manifest = Map::new();
        for level in &self.levels {
            let entries: Vec<Value> = level
                .entities
                .iter()
                .map(|entity| {
                    let location = map_coordinates(
                        level.origin,
                        (entity.x, entity.y),
                        level.layer,
                        options.offset,
                        options.plane,
                    );
                    let mut fields = entity.fields.clone();
                    for value in fields.values_mut() {
                        remap_points(value, level, options);
                    }
                    json!({
                        "identifier": entity.identifier,
                        "location": location,
                        "fields": fields,
                    })
                })
                .collect();
            manifest.insert(level.name.clone(), Value::Array(entries));
        }
        manifest
    }
}

/// Rewrite LDtk point values (`{cx, cy}`, alone or in arrays) to world coordinates.
fn remap_points(value: &mut Value, level: &TileLevel, options: &ConvertOptions) {
    match value {
        Value::Array(items) => {
            for item in items {
                remap_points(item, level, options);
            }
        }
        Value::Object(point) => {
            let (Some(cx), Some(cy)) = (
                point.get("cx").and_then(Value::as_f64),
                point.get("cy").and_then(Value::as_f64),
            ) else {
                return;
            };
            let pos = map_coordinates(level.origin, (cx, cy), level.layer, options.offset, options.plane);
            point.insert("cx".into(), json!(pos.x));
            point.insert("cy".into(), json!(pos.vertical(options.plane)));
        }
        _ => {}
    }
}

/// Chunks covered by a level's area and by every one of its tiles.
fn footprint_chunks(level: &TileLevel, options: &ConvertOptions) -> Vec<(i32, i32)> {
    let mut chunks: BTreeSet<(i32, i32)> = level
        .tiles
        .iter()
        .map(|tile| {
            let pos = map_coordinates(
                level.origin,
                (tile.x, tile.y),
                level.layer,
                options.offset,
                options.plane,
            );
            (chunk_coord(pos.x), chunk_coord(pos.z))
        })
        .collect();

    let (w, h) = level.size;
    if w <= 0 || h <= 0 {
        return chunks.into_iter().collect();
    }
    let corner = |x: i32, y: i32| {
        map_coordinates(
            level.origin,
            (x as f64, y as f64),
            level.layer,
            options.offset,
            options.plane,
        )
    };
    let (a, b) = (corner(0, 0), corner(w - 1, h - 1));
    let (x0, x1) = (chunk_coord(a.x.min(b.x)), chunk_coord(a.x.max(b.x)));
    let (z0, z1) = (chunk_coord(a.z.min(b.z)), chunk_coord(a.z.max(b.z)));

    chunks.extend((x0..=x1).flat_map(|cx| (z0..=z1).map(move |cz| (cx, cz))));
    chunks.into_iter().collect()
}

/// Run a whole conversion as described by `config`.
pub fn run(config: &ConverterConfig) -> Result<ConversionReport, ConvertError> {
    let options = config.options()?;
    let converter = TileWorldConverter::load(&config.source.path, &config.source.namespace)?;
    let world = LevelDbWorld::load(&config.world.path)?;
    let mut scripts = ScriptDirectory::new(&config.output.script_dir);
    converter.convert(world, &options, &mut scripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Offset, Plane};
    use crate::level::TilePlacement;
    use mcaddon_world::{Dimension, GameVersion};
    use std::collections::BTreeSet;

    /// Records every call; chunks must exist before writes, like the real store.
    #[derive(Default)]
    struct RecordingStore {
        chunks: BTreeSet<(i32, i32)>,
        deleted: Vec<(i32, i32)>,
        blocks: HashMap<(i32, i32, i32), BlockState>,
        writes: Vec<((i32, i32, i32), String)>,
        closed: bool,
    }

    impl VoxelStore for &mut RecordingStore {
        fn all_chunk_coords(&mut self, _dimension: Dimension) -> Result<Vec<(i32, i32)>, WorldError> {
            Ok(self.chunks.iter().copied().collect())
        }

        fn delete_chunk(&mut self, cx: i32, cz: i32, _dimension: Dimension) -> Result<(), WorldError> {
            self.chunks.remove(&(cx, cz));
            self.deleted.push((cx, cz));
            Ok(())
        }

        fn create_chunk(&mut self, cx: i32, cz: i32, _dimension: Dimension) -> Result<(), WorldError> {
            self.chunks.insert((cx, cz));
            Ok(())
        }

        fn set_version_block(
            &mut self,
            x: i32,
            y: i32,
            z: i32,
            dimension: Dimension,
            _version: &GameVersion,
            block: &BlockState,
        ) -> Result<(), WorldError> {
            let (cx, cz) = (chunk_coord(x), chunk_coord(z));
            if !self.chunks.contains(&(cx, cz)) {
                return Err(WorldError::ChunkNotFound { cx, cz, dimension });
            }
            self.blocks.insert((x, y, z), block.clone());
            self.writes.push(((x, y, z), block.identifier()));
            Ok(())
        }

        fn get_block(
            &mut self,
            x: i32,
            y: i32,
            z: i32,
            _dimension: Dimension,
        ) -> Result<Option<BlockState>, WorldError> {
            Ok(self.blocks.get(&(x, y, z)).cloned())
        }

        fn save(&mut self) -> Result<(), WorldError> {
            Ok(())
        }

        fn close(self) -> Result<(), WorldError> {
            self.closed = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryScripts {
        files: Vec<(String, String)>,
    }

    impl ScriptSink for MemoryScripts {
        fn write_script(&mut self, file_name: &str, source: &str) -> Result<(), ConvertError> {
            self.files.push((file_name.to_string(), source.to_string()));
            Ok(())
        }
    }

    const PROJECT: &str = r#"{
        "defaultGridSize": 16,
        "defs": { "tilesets": [ { "uid": 1, "identifier": "Blocks", "customData": [
            { "tileId": 0, "data": "id=minecraft:stone" },
            { "tileId": 1, "data": "id=oak_stairs\norigin=minecraft:dirt\nproperties=weirdo_direction:2" },
            { "tileId": 2, "data": "" }
        ] } ] },
        "levels": [ {
            "identifier": "Level_0",
            "worldX": 160, "worldY": 320, "pxWid": 64, "pxHei": 32, "worldDepth": 3,
            "layerInstances": [
                { "__identifier": "Entities", "entityInstances": [
                    { "px": [16, 16], "__identifier": "Guard", "fieldInstances": [
                        { "__identifier": "patrol", "__value": [ { "cx": 2, "cy": 1 } ] },
                        { "__identifier": "point", "__value": { "cx": 1, "cy": 0 } },
                        { "__identifier": "name", "__value": "Bob" }
                    ] },
                    { "px": [0, 0], "__identifier": "Cow", "fieldInstances": [
                        { "__identifier": "vanilla", "__value": true }
                    ] }
                ] },
                { "__identifier": "Front", "__tilesetDefUid": 1, "gridTiles": [ { "px": [0, 0], "t": 1 } ] },
                { "__identifier": "Back", "__tilesetDefUid": 1, "gridTiles": [
                    { "px": [0, 0], "t": 0 },
                    { "px": [48, 16], "t": 2 }
                ] }
            ]
        } ]
    }"#;

    fn converter() -> TileWorldConverter {
        TileWorldConverter::parse_with_catalog(PROJECT, Path::new("."), "demo", IdentifierCatalog)
            .unwrap()
    }

    #[test]
    fn wrong_grid_size_fails_first() {
        // The level data is malformed too; the grid check must come first.
        let json = r#"{ "defaultGridSize": 8, "levels": "not a list" }"#;
        let err = TileWorldConverter::parse_with_catalog(json, Path::new("."), "demo", IdentifierCatalog)
            .err()
            .unwrap();
        assert!(matches!(err, ConvertError::GridSize { found: 8 }));
    }

    #[test]
    fn horizontal_conversion() {
        let converter = converter();
        let level = &converter.levels()[0];
        assert_eq!(level.origin, (10, 20));
        assert_eq!(level.layer, 3);

        let mut store = RecordingStore::default();
        let mut scripts = MemoryScripts::default();
        let options = ConvertOptions::new(Plane::Horizontal, Offset::default(), true);
        let report = converter.convert(&mut store, &options, &mut scripts).unwrap();

        assert_eq!(report.tiles, 3);
        assert_eq!(report.entities, 2);
        assert_eq!(report.chunks_created, 1);
        assert!(store.closed);

        // Back layer is processed first, so Front's stairs win at (10, -3, 20).
        assert_eq!(
            store.writes,
            vec![
                ((10, -3, 20), "minecraft:air".to_string()),
                ((10, -3, 20), "minecraft:stone".to_string()),
                ((13, -3, 21), "minecraft:air".to_string()),
                ((13, -3, 21), "minecraft:air".to_string()),
                ((10, -3, 20), "minecraft:dirt".to_string()),
                ((10, -3, 20), "minecraft:oak_stairs".to_string()),
            ]
        );
        let top = &store.blocks[&(10, -3, 20)];
        assert_eq!(top.name, "oak_stairs");
        assert_eq!(
            top.properties.get("weirdo_direction"),
            Some(&mcaddon_world::BlockProperty::Int(2))
        );
    }

    #[test]
    fn entity_manifest_script() {
        let converter = converter();
        let mut store = RecordingStore::default();
        let mut scripts = MemoryScripts::default();
        let options = ConvertOptions::new(Plane::Horizontal, Offset::from([0, 64, 0]), true);
        converter.convert(&mut store, &options, &mut scripts).unwrap();

        let (file, source) = &scripts.files[0];
        assert_eq!(file, "ldtk_levels.js");
        let json = source
            .split_once(" = ")
            .map(|(_, rest)| rest.trim_end().trim_end_matches(';'))
            .unwrap();
        assert!(source.contains("export const ldtk_levels = "));
        let manifest: Value = serde_json::from_str(json).unwrap();
        let guard = &manifest["Level_0"][0];
        assert_eq!(guard["identifier"], json!("demo:guard"));
        assert_eq!(guard["location"], json!({ "x": 11, "y": 61, "z": 21 }));
        assert_eq!(guard["fields"]["point"], json!({ "cx": 11, "cy": 20 }));
        assert_eq!(guard["fields"]["patrol"], json!([{ "cx": 12, "cy": 21 }]));
        assert_eq!(guard["fields"]["name"], json!("Bob"));
        assert_eq!(manifest["Level_0"][1]["identifier"], json!("minecraft:cow"));
    }

    #[test]
    fn vertical_point_uses_world_y() {
        let converter = converter();
        let mut store = RecordingStore::default();
        let mut scripts = MemoryScripts::default();
        let options = ConvertOptions::new(Plane::Vertical, Offset::from([0, 100, 0]), true);
        converter.convert(&mut store, &options, &mut scripts).unwrap();

        // Tile (0, 0): (10, -64 + 20 - 0 + 100, 0 - 3)
        assert_eq!(
            store.blocks[&(10, 56, -3)].identifier(),
            "minecraft:oak_stairs"
        );
        let source = &scripts.files[0].1;
        let json = source.split_once(" = ").unwrap().1.trim_end().trim_end_matches(';');
        let manifest: Value = serde_json::from_str(json).unwrap();
        // point (1, 0): cx = 10 + 1, cy = -64 + 20 - 0 + 100
        assert_eq!(
            manifest["Level_0"][0]["fields"]["point"],
            json!({ "cx": 11, "cy": 56 })
        );
    }

    #[test]
    fn entities_can_be_skipped() {
        let converter = converter();
        let mut store = RecordingStore::default();
        let mut scripts = MemoryScripts::default();
        let options = ConvertOptions::new(Plane::Horizontal, Offset::default(), false);
        let report = converter.convert(&mut store, &options, &mut scripts).unwrap();
        assert_eq!(report.entities, 0);
        assert!(scripts.files.is_empty());
    }

    #[test]
    fn clear_deletes_existing_chunks() {
        let converter = converter();
        let mut store = RecordingStore::default();
        store.chunks.insert((-5, -5));
        let mut scripts = MemoryScripts::default();
        let mut options = ConvertOptions::new(Plane::Horizontal, Offset::default(), false);
        options.clear = true;
        converter.convert(&mut store, &options, &mut scripts).unwrap();
        assert_eq!(store.deleted, vec![(-5, -5)]);
        assert!(!store.chunks.contains(&(-5, -5)));
    }

    #[test]
    fn missing_tile_data_fails_before_writing() {
        let json = PROJECT.replace(r#""t": 2"#, r#""t": 9"#);
        let converter =
            TileWorldConverter::parse_with_catalog(&json, Path::new("."), "demo", IdentifierCatalog)
                .unwrap();
        let mut store = RecordingStore::default();
        let mut scripts = MemoryScripts::default();
        let options = ConvertOptions::new(Plane::Horizontal, Offset::default(), true);
        let err = converter.convert(&mut store, &options, &mut scripts).unwrap_err();
        assert!(matches!(err, ConvertError::MissingTileData { tileset: 1, tile: 9 }));
        assert!(store.writes.is_empty());
        assert!(store.chunks.is_empty());
        assert!(scripts.files.is_empty());
    }

    #[test]
    fn footprint_spans_chunk_boundaries() {
        let level = TileLevel {
            name: "L".into(),
            origin: (-4, 10),
            size: (20, 10),
            layer: 0,
            tiles: Vec::new(),
            entities: Vec::new(),
        };
        let options = ConvertOptions::new(Plane::Horizontal, Offset::default(), false);
        // x: -4..=15 -> chunks -1..=0; z: 10..=19 -> chunks 0..=1
        assert_eq!(
            footprint_chunks(&level, &options),
            vec![(-1, 0), (-1, 1), (0, 0), (0, 1)]
        );
        let options = ConvertOptions::new(Plane::Vertical, Offset::default(), false);
        // z = 0 - layer = 0 -> single chunk row
        assert_eq!(footprint_chunks(&level, &options), vec![(-1, 0), (0, 0)]);
    }

    #[test]
    fn tiles_outside_the_footprint_get_chunks() {
        let level = TileLevel {
            name: "L".into(),
            origin: (0, 0),
            size: (1, 1),
            layer: 0,
            tiles: vec![TilePlacement { x: 40.0, y: 0.0, tileset: 1, tile: 0 }],
            entities: Vec::new(),
        };
        let options = ConvertOptions::new(Plane::Horizontal, Offset::default(), false);
        assert_eq!(footprint_chunks(&level, &options), vec![(0, 0), (2, 0)]);
    }

    #[test]
    fn out_of_range_tile_fails_before_clearing() {
        let converter = converter();
        let mut store = RecordingStore::default();
        store.chunks.insert((5, 5));
        let mut scripts = MemoryScripts::default();
        // Tile (3, 1) lands at y = -64 + 20 - 1 - 20 = -65.
        let mut options = ConvertOptions::new(Plane::Vertical, Offset::from([0, -20, 0]), true);
        options.clear = true;

        let err = converter.convert(&mut store, &options, &mut scripts).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::World(WorldError::OutOfBounds { y: -65, dimension: Dimension::Overworld })
        ));
        assert!(store.deleted.is_empty());
        assert!(store.chunks.contains(&(5, 5)));
        assert!(store.writes.is_empty());
        assert!(scripts.files.is_empty());
    }

    #[test]
    fn non_bedrock_version_fails_before_clearing() {
        let converter = converter();
        let mut store = RecordingStore::default();
        store.chunks.insert((5, 5));
        let mut scripts = MemoryScripts::default();
        let mut options = ConvertOptions::new(Plane::Horizontal, Offset::default(), false);
        options.clear = true;
        options.version = GameVersion {
            platform: "java".into(),
            version: [1, 20, 4, 0],
        };
        assert!(matches!(
            converter.convert(&mut store, &options, &mut scripts),
            Err(ConvertError::World(WorldError::UnsupportedPlatform(_)))
        ));
        assert!(store.deleted.is_empty());
    }

    #[test]
    fn failed_run_keeps_saved_world() {
        let dir = std::env::temp_dir().join(format!("mcaddon_keep_{}", rand::random::<u64>()));
        std::fs::create_dir_all(&dir).unwrap();
        let glass = BlockState::from_identifier("glass");
        {
            let mut world = LevelDbWorld::load(&dir).unwrap();
            world.create_chunk(5, 5, Dimension::Overworld).unwrap();
            world
                .set_version_block(80, 10, 80, Dimension::Overworld, &GameVersion::default(), &glass)
                .unwrap();
            world.close().unwrap();
        }

        let mut options = ConvertOptions::new(Plane::Vertical, Offset::from([0, -20, 0]), true);
        options.clear = true;
        let world = LevelDbWorld::load(&dir).unwrap();
        let mut scripts = MemoryScripts::default();
        assert!(converter().convert(world, &options, &mut scripts).is_err());

        let mut world = LevelDbWorld::load(&dir).unwrap();
        assert_eq!(
            world.get_block(80, 10, 80, Dimension::Overworld).unwrap(),
            Some(glass)
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn leveldb_end_to_end() {
        let dir = std::env::temp_dir().join(format!("mcaddon_convert_{}", rand::random::<u64>()));
        std::fs::create_dir_all(&dir).unwrap();
        let project = dir.join("world.ldtk");
        std::fs::write(&project, PROJECT).unwrap();
        std::fs::write(
            dir.join("convert.toml"),
            format!(
                "[source]\npath = {:?}\nnamespace = \"demo\"\n\n[world]\npath = {:?}\n\n[output]\nscript_dir = {:?}\n",
                project.display().to_string(),
                dir.join("db").display().to_string(),
                dir.join("scripts").display().to_string(),
            ),
        )
        .unwrap();

        let config = ConverterConfig::load(dir.join("convert.toml")).unwrap();
        let report = run(&config).unwrap();
        assert_eq!(report.tiles, 3);

        let mut world = LevelDbWorld::load(&dir.join("db")).unwrap();
        assert_eq!(
            world
                .get_block(10, -3, 20, Dimension::Overworld)
                .unwrap()
                .map(|b| b.identifier()),
            Some("minecraft:oak_stairs".to_string())
        );
        assert!(dir.join("scripts/ldtk_levels.js").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
