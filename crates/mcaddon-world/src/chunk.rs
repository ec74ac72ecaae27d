//! Chunk columns and paletted sub-chunks.

use crate::block::Dimension;

/// Blocks per sub-chunk (16x16x16).
pub const SUB_CHUNK_VOLUME: usize = 4096;

/// A 16x16x16 sub-chunk with a single storage layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubChunk {
    /// Palette indices in XZY order: `(x*16 + z)*16 + y`.
    pub blocks: Box<[u16; SUB_CHUNK_VOLUME]>,
    /// Block runtime IDs referenced by `blocks`.
    pub palette: Vec<u32>,
}

impl SubChunk {
    /// A sub-chunk filled with one block.
    pub fn filled(runtime_id: u32) -> Self {
        Self {
            blocks: Box::new([0; SUB_CHUNK_VOLUME]),
            palette: vec![runtime_id],
        }
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < 16 && y < 16 && z < 16);
        (x * 16 + z) * 16 + y
    }

    /// Palette slot for `runtime_id`, growing the palette if needed.
    ///
    /// The palette is compacted before it can exceed `SUB_CHUNK_VOLUME + 1`
    /// entries, so slots always fit in a `u16`.
    fn palette_slot(&mut self, runtime_id: u32) -> u16 {
        if let Some(slot) = self.palette.iter().position(|&id| id == runtime_id) {
            return slot as u16;
        }
        if self.palette.len() > SUB_CHUNK_VOLUME {
            self.compact();
        }
        self.palette.push(runtime_id);
        (self.palette.len() - 1) as u16
    }

    /// Drop palette entries no block references, keeping the order of the rest.
    pub fn compact(&mut self) {
        let mut used = vec![false; self.palette.len()];
        for &slot in self.blocks.iter() {
            used[slot as usize] = true;
        }
        if used.iter().all(|&u| u) {
            return;
        }

        let mut remap = vec![0u16; self.palette.len()];
        let mut palette = Vec::with_capacity(self.palette.len());
        for (old, &runtime_id) in self.palette.iter().enumerate() {
            if used[old] {
                remap[old] = palette.len() as u16;
                palette.push(runtime_id);
            }
        }
        for slot in self.blocks.iter_mut() {
            *slot = remap[*slot as usize];
        }
        self.palette = palette;
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, runtime_id: u32) {
        let slot = self.palette_slot(runtime_id);
        self.blocks[Self::index(x, y, z)] = slot;
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> u32 {
        self.palette[self.blocks[Self::index(x, y, z)] as usize]
    }

    /// `true` when every block uses the first palette entry.
    pub fn is_uniform(&self) -> bool {
        self.blocks.iter().all(|&slot| slot == 0)
    }
}

/// A full-height column of sub-chunks at chunk coordinates `(x, z)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkColumn {
    pub x: i32,
    pub z: i32,
    pub dimension: Dimension,
    pub sub_chunks: Vec<SubChunk>,
    /// Set on every write, cleared once persisted.
    pub dirty: bool,
}

impl ChunkColumn {
    /// A column filled with `air_id`, marked dirty so it gets persisted.
    pub fn new_air(x: i32, z: i32, dimension: Dimension, air_id: u32) -> Self {
        Self {
            x,
            z,
            dimension,
            sub_chunks: (0..dimension.sub_chunk_count())
                .map(|_| SubChunk::filled(air_id))
                .collect(),
            dirty: true,
        }
    }

    /// Split a world Y into (sub-chunk index, local y); `None` outside the build height.
    fn locate_y(&self, y: i32) -> Option<(usize, usize)> {
        if y < self.dimension.min_y() || y >= self.dimension.max_y() {
            return None;
        }
        let offset = (y - self.dimension.min_y()) as usize;
        Some((offset / 16, offset % 16))
    }

    /// Set a block from world coordinates. Returns `false` if `y` is out of range.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, runtime_id: u32) -> bool {
        let Some((section, local_y)) = self.locate_y(y) else {
            return false;
        };
        self.sub_chunks[section].set(
            x.rem_euclid(16) as usize,
            local_y,
            z.rem_euclid(16) as usize,
            runtime_id,
        );
        self.dirty = true;
        true
    }

    /// Compact every sub-chunk palette.
    pub fn compact(&mut self) {
        for sub in &mut self.sub_chunks {
            sub.compact();
        }
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<u32> {
        let (section, local_y) = self.locate_y(y)?;
        Some(self.sub_chunks[section].get(
            x.rem_euclid(16) as usize,
            local_y,
            z.rem_euclid(16) as usize,
        ))
    }
}

/// Chunk coordinate containing world coordinate `v`.
pub fn chunk_coord(v: i32) -> i32 {
    v.div_euclid(16)
}
