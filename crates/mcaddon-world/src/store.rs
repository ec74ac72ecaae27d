//! The voxel store interface and its LevelDB implementation.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, info};

use crate::block::{BlockState, Dimension, GameVersion};
use crate::block_hash::runtime_id;
use crate::chunk::{chunk_coord, ChunkColumn};
use crate::error::WorldError;
use crate::storage::LevelDbProvider;

/// A chunked 3D block store.
///
/// Blocks can only be written into chunks that exist; writing the same
/// coordinate twice overwrites in place.
pub trait VoxelStore {
    /// Chunk coordinates of every existing chunk in `dimension`, sorted.
    fn all_chunk_coords(&mut self, dimension: Dimension) -> Result<Vec<(i32, i32)>, WorldError>;

    fn delete_chunk(&mut self, cx: i32, cz: i32, dimension: Dimension) -> Result<(), WorldError>;

    /// Create an empty (air) chunk. Existing chunks are left untouched.
    fn create_chunk(&mut self, cx: i32, cz: i32, dimension: Dimension) -> Result<(), WorldError>;

    fn set_version_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        dimension: Dimension,
        version: &GameVersion,
        block: &BlockState,
    ) -> Result<(), WorldError>;

    /// The block at a coordinate, or `None` if its chunk does not exist.
    fn get_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        dimension: Dimension,
    ) -> Result<Option<BlockState>, WorldError>;

    /// Persist all pending changes.
    fn save(&mut self) -> Result<(), WorldError>;

    /// Save and release the store.
    fn close(self) -> Result<(), WorldError>
    where
        Self: Sized;
}

/// A world directory backed by LevelDB, with an in-memory chunk cache.
pub struct LevelDbWorld {
    provider: LevelDbProvider,
    chunks: HashMap<(Dimension, i32, i32), ChunkColumn>,
    /// Every existing chunk: the saved ones found at load plus those created since.
    index: BTreeMap<Dimension, BTreeSet<(i32, i32)>>,
    palette: BTreeMap<u32, BlockState>,
    air_id: u32,
    palette_dirty: bool,
}

impl LevelDbWorld {
    /// Open (or create) the world database at `path`.
    pub fn load(path: &Path) -> Result<Self, WorldError> {
        let mut provider = LevelDbProvider::open(path)?;
        let mut palette = provider.load_palette()?;
        let index = provider.scan_chunk_coords()?;

        let air = BlockState::air();
        let air_id = runtime_id(&air, &GameVersion::default());
        let palette_dirty = palette.insert(air_id, air).is_none();

        info!(
            "Opened world at {} ({} chunk(s), {} block state(s))",
            path.display(),
            index.values().map(BTreeSet::len).sum::<usize>(),
            palette.len()
        );

        Ok(Self {
            provider,
            chunks: HashMap::new(),
            index,
            palette,
            air_id,
            palette_dirty,
        })
    }

    fn exists(&self, cx: i32, cz: i32, dimension: Dimension) -> bool {
        self.index
            .get(&dimension)
            .is_some_and(|set| set.contains(&(cx, cz)))
    }

    /// Cached column, loading it from disk on first access.
    fn column(
        &mut self,
        cx: i32,
        cz: i32,
        dimension: Dimension,
    ) -> Result<Option<&mut ChunkColumn>, WorldError> {
        if !self.exists(cx, cz, dimension) {
            return Ok(None);
        }
        let key = (dimension, cx, cz);
        if !self.chunks.contains_key(&key) {
            let air_id = self.air_id;
            let column = self
                .provider
                .load_chunk(cx, cz, dimension)?
                .unwrap_or_else(|| ChunkColumn::new_air(cx, cz, dimension, air_id));
            self.chunks.insert(key, column);
        }
        Ok(self.chunks.get_mut(&key))
    }
}

impl VoxelStore for LevelDbWorld {
    fn all_chunk_coords(&mut self, dimension: Dimension) -> Result<Vec<(i32, i32)>, WorldError> {
        Ok(self
            .index
            .get(&dimension)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    fn delete_chunk(&mut self, cx: i32, cz: i32, dimension: Dimension) -> Result<(), WorldError> {
        self.chunks.remove(&(dimension, cx, cz));
        if let Some(set) = self.index.get_mut(&dimension) {
            set.remove(&(cx, cz));
        }
        self.provider.delete_chunk(cx, cz, dimension)
    }

    fn create_chunk(&mut self, cx: i32, cz: i32, dimension: Dimension) -> Result<(), WorldError> {
        if self.exists(cx, cz, dimension) {
            return Ok(());
        }
        if self.provider.chunk_exists(cx, cz, dimension) {
            debug!("Chunk ({cx}, {cz}) in the {dimension} already saved, keeping it");
            self.index.entry(dimension).or_default().insert((cx, cz));
            return Ok(());
        }
        debug!("Creating chunk ({cx}, {cz}) in the {dimension}");
        self.chunks.insert(
            (dimension, cx, cz),
            ChunkColumn::new_air(cx, cz, dimension, self.air_id),
        );
        self.index.entry(dimension).or_default().insert((cx, cz));
        Ok(())
    }

    fn set_version_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        dimension: Dimension,
        version: &GameVersion,
        block: &BlockState,
    ) -> Result<(), WorldError> {
        if version.platform != "bedrock" {
            return Err(WorldError::UnsupportedPlatform(version.platform.clone()));
        }
        let id = runtime_id(block, version);
        if !self.palette.contains_key(&id) {
            self.palette.insert(id, block.clone());
            self.palette_dirty = true;
        }

        let (cx, cz) = (chunk_coord(x), chunk_coord(z));
        let column = self
            .column(cx, cz, dimension)?
            .ok_or(WorldError::ChunkNotFound { cx, cz, dimension })?;
        if column.set_block(x, y, z, id) {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds { y, dimension })
        }
    }

    fn get_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        dimension: Dimension,
    ) -> Result<Option<BlockState>, WorldError> {
        let Some(column) = self.column(chunk_coord(x), chunk_coord(z), dimension)? else {
            return Ok(None);
        };
        let Some(id) = column.get_block(x, y, z) else {
            return Err(WorldError::OutOfBounds { y, dimension });
        };
        Ok(self.palette.get(&id).cloned())
    }

    fn save(&mut self) -> Result<(), WorldError> {
        let mut written = 0;
        for column in self.chunks.values_mut().filter(|c| c.dirty) {
            column.compact();
            self.provider.save_chunk(column)?;
            column.dirty = false;
            written += 1;
        }
        if self.palette_dirty {
            self.provider.save_palette(&self.palette)?;
            self.palette_dirty = false;
        }
        self.provider.flush()?;
        debug!("Saved {written} chunk(s)");
        Ok(())
    }

    fn close(mut self) -> Result<(), WorldError> {
        self.save()?;
        info!("Closed world ({} chunk(s) cached)", self.chunks.len());
        Ok(())
    }
}
