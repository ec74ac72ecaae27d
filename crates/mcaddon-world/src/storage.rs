//! LevelDB-based chunk storage.
//!
//! Chunks use the Bedrock LevelDB key layout. Sub-chunk palettes hold FNV-1a
//! runtime IDs instead of NBT compounds, so the block state behind every ID
//! is persisted separately in a palette record. Existing chunks are found by
//! their version keys.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use bytes::{Buf, BufMut, BytesMut};
use rusty_leveldb::{LdbIterator, DB};

use crate::block::{BlockState, Dimension};
use crate::chunk::{ChunkColumn, SubChunk, SUB_CHUNK_VOLUME};
use crate::error::WorldError;

// ─── LevelDB key tags ───────────────────────────────────────────────────────

const TAG_CHUNK_VERSION: u8 = 0x2C;
const TAG_SUB_CHUNK_PREFIX: u8 = 0x2F;
const TAG_FINALIZED_STATE: u8 = 0x36;

/// Current chunk format version.
const CHUNK_VERSION: u8 = 40;

/// Sub-chunk storage format version.
const SUB_CHUNK_FORMAT: u8 = 9;

const PALETTE_KEY: &[u8] = b"mcaddon:block_palette";

// ─── Key builders ───────────────────────────────────────────────────────────

/// `[X:i32_le][Z:i32_le]([dim:i32_le] unless overworld)[tag]`
fn chunk_key(cx: i32, cz: i32, dimension: Dimension, tag: u8) -> Vec<u8> {
    let mut key = Vec::with_capacity(14);
    key.extend_from_slice(&cx.to_le_bytes());
    key.extend_from_slice(&cz.to_le_bytes());
    if dimension != Dimension::Overworld {
        key.extend_from_slice(&dimension.id().to_le_bytes());
    }
    key.push(tag);
    key
}

/// Chunk key with the sub-chunk tag followed by the signed section index.
fn sub_chunk_key(cx: i32, cz: i32, dimension: Dimension, y_index: i8) -> Vec<u8> {
    let mut key = chunk_key(cx, cz, dimension, TAG_SUB_CHUNK_PREFIX);
    key.push(y_index as u8);
    key
}

/// Section indices of a column, bottom to top (overworld: -4..=19).
fn section_indices(dimension: Dimension) -> impl Iterator<Item = i8> {
    let first = (dimension.min_y() / 16) as i8;
    (0..dimension.sub_chunk_count()).map(move |i| first + i as i8)
}

/// Parse a chunk version key back into its dimension and coordinates.
fn parse_version_key(key: &[u8]) -> Option<(Dimension, i32, i32)> {
    let read = |at: usize| i32::from_le_bytes([key[at], key[at + 1], key[at + 2], key[at + 3]]);
    match key.len() {
        9 if key[8] == TAG_CHUNK_VERSION => Some((Dimension::Overworld, read(0), read(4))),
        13 if key[12] == TAG_CHUNK_VERSION => {
            let dimension = Dimension::from_id(read(8)).filter(|d| *d != Dimension::Overworld)?;
            Some((dimension, read(0), read(4)))
        }
        _ => None,
    }
}

// ─── Sub-chunk encoding ─────────────────────────────────────────────────────

/// Smallest valid bits-per-block for a palette size.
fn bits_per_block(palette_size: usize) -> u8 {
    match palette_size {
        0..=1 => 0,
        2 => 1,
        3..=4 => 2,
        5..=8 => 3,
        9..=16 => 4,
        17..=32 => 5,
        33..=64 => 6,
        65..=256 => 8,
        _ => 16,
    }
}

/// `[version][layers=1][bpb << 1][packed words...][palette_len:i32_le][palette:u32_le...]`
fn serialize_sub_chunk(sub: &SubChunk) -> Vec<u8> {
    let bpb = bits_per_block(sub.palette.len());
    let mut buf = BytesMut::with_capacity(SUB_CHUNK_VOLUME / 2 + 4 * sub.palette.len() + 8);
    buf.put_u8(SUB_CHUNK_FORMAT);
    buf.put_u8(1);
    buf.put_u8(bpb << 1);

    if bpb > 0 {
        let per_word = 32 / bpb as usize;
        for group in sub.blocks.chunks(per_word) {
            let word = group.iter().enumerate().fold(0u32, |word, (slot, &index)| {
                word | (index as u32) << (bpb as u32 * slot as u32)
            });
            buf.put_u32_le(word);
        }
    }

    buf.put_i32_le(sub.palette.len() as i32);
    for &runtime_id in &sub.palette {
        buf.put_u32_le(runtime_id);
    }
    buf.to_vec()
}

fn deserialize_sub_chunk(mut data: &[u8]) -> Result<SubChunk, WorldError> {
    if data.remaining() < 3 {
        return Err(WorldError::CorruptSubChunk("truncated header"));
    }
    if data.get_u8() != SUB_CHUNK_FORMAT {
        return Err(WorldError::CorruptSubChunk("unsupported format version"));
    }
    let _layers = data.get_u8();
    let bpb = data.get_u8() >> 1;

    let mut blocks = Box::new([0u16; SUB_CHUNK_VOLUME]);
    if bpb > 0 {
        if !matches!(bpb, 1..=6 | 8 | 16) {
            return Err(WorldError::CorruptSubChunk("invalid bits per block"));
        }
        let per_word = 32 / bpb as usize;
        let words = SUB_CHUNK_VOLUME.div_ceil(per_word);
        if data.remaining() < words * 4 {
            return Err(WorldError::CorruptSubChunk("truncated block data"));
        }
        let mask = (1u32 << bpb) - 1;
        for word_idx in 0..words {
            let word = data.get_u32_le();
            for slot in 0..per_word {
                let idx = word_idx * per_word + slot;
                if idx < SUB_CHUNK_VOLUME {
                    blocks[idx] = ((word >> (bpb as u32 * slot as u32)) & mask) as u16;
                }
            }
        }
    }

    if data.remaining() < 4 {
        return Err(WorldError::CorruptSubChunk("missing palette"));
    }
    let palette_len = data.get_i32_le();
    if palette_len < 1 || data.remaining() < palette_len as usize * 4 {
        return Err(WorldError::CorruptSubChunk("bad palette length"));
    }
    let palette: Vec<u32> = (0..palette_len).map(|_| data.get_u32_le()).collect();

    if blocks.iter().any(|&slot| slot as usize >= palette.len()) {
        return Err(WorldError::CorruptSubChunk("palette index out of range"));
    }
    Ok(SubChunk { blocks, palette })
}

// ─── LevelDB provider ──────────────────────────────────────────────────────

/// Wraps a `rusty_leveldb::DB` for chunk persistence.
pub struct LevelDbProvider {
    db: DB,
}

impl LevelDbProvider {
    /// Open or create a LevelDB database at the given path.
    pub fn open(path: &Path) -> Result<Self, WorldError> {
        let opts = rusty_leveldb::Options {
            create_if_missing: true,
            ..rusty_leveldb::Options::default()
        };
        let db = DB::open(path, opts).map_err(|e| WorldError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { db })
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), WorldError> {
        self.db
            .put(key, value)
            .map_err(|e| WorldError::Db(e.to_string()))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), WorldError> {
        self.db
            .delete(key)
            .map_err(|e| WorldError::Db(e.to_string()))
    }

    /// Load a chunk column. Returns `None` if the chunk was never saved.
    pub fn load_chunk(
        &mut self,
        cx: i32,
        cz: i32,
        dimension: Dimension,
    ) -> Result<Option<ChunkColumn>, WorldError> {
        if !self.chunk_exists(cx, cz, dimension) {
            return Ok(None);
        }

        let mut sub_chunks = Vec::with_capacity(dimension.sub_chunk_count());
        for y_index in section_indices(dimension) {
            let sub = match self.db.get(&sub_chunk_key(cx, cz, dimension, y_index)) {
                Some(data) => deserialize_sub_chunk(&data)?,
                None => return Err(WorldError::CorruptSubChunk("missing section")),
            };
            sub_chunks.push(sub);
        }

        Ok(Some(ChunkColumn {
            x: cx,
            z: cz,
            dimension,
            sub_chunks,
            dirty: false,
        }))
    }

    /// Write every section of a column plus its version and finalized markers.
    pub fn save_chunk(&mut self, column: &ChunkColumn) -> Result<(), WorldError> {
        let (cx, cz, dim) = (column.x, column.z, column.dimension);
        self.put(&chunk_key(cx, cz, dim, TAG_CHUNK_VERSION), &[CHUNK_VERSION])?;
        for (y_index, sub) in section_indices(dim).zip(&column.sub_chunks) {
            self.put(&sub_chunk_key(cx, cz, dim, y_index), &serialize_sub_chunk(sub))?;
        }
        self.put(
            &chunk_key(cx, cz, dim, TAG_FINALIZED_STATE),
            &2i32.to_le_bytes(),
        )
    }

    /// Remove every record of a chunk.
    pub fn delete_chunk(&mut self, cx: i32, cz: i32, dimension: Dimension) -> Result<(), WorldError> {
        self.delete(&chunk_key(cx, cz, dimension, TAG_CHUNK_VERSION))?;
        self.delete(&chunk_key(cx, cz, dimension, TAG_FINALIZED_STATE))?;
        for y_index in section_indices(dimension) {
            self.delete(&sub_chunk_key(cx, cz, dimension, y_index))?;
        }
        Ok(())
    }

    pub fn load_palette(&mut self) -> Result<BTreeMap<u32, BlockState>, WorldError> {
        match self.db.get(PALETTE_KEY) {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Ok(BTreeMap::new()),
        }
    }

    pub fn save_palette(&mut self, palette: &BTreeMap<u32, BlockState>) -> Result<(), WorldError> {
        let data = serde_json::to_vec(palette)?;
        self.put(PALETTE_KEY, &data)
    }

    /// `true` if the chunk's version key is present.
    pub fn chunk_exists(&mut self, cx: i32, cz: i32, dimension: Dimension) -> bool {
        self.db
            .get(&chunk_key(cx, cz, dimension, TAG_CHUNK_VERSION))
            .is_some()
    }

    /// Coordinates of every saved chunk, per dimension, from a full key scan.
    pub fn scan_chunk_coords(
        &mut self,
    ) -> Result<BTreeMap<Dimension, BTreeSet<(i32, i32)>>, WorldError> {
        let mut found: BTreeMap<Dimension, BTreeSet<(i32, i32)>> = BTreeMap::new();
        let mut iter = self
            .db
            .new_iter()
            .map_err(|e| WorldError::Db(e.to_string()))?;
        while let Some((key, _)) = iter.next() {
            if let Some((dimension, cx, cz)) = parse_version_key(&key) {
                found.entry(dimension).or_default().insert((cx, cz));
            }
        }
        Ok(found)
    }

    /// Flush pending writes to disk.
    pub fn flush(&mut self) -> Result<(), WorldError> {
        self.db.flush().map_err(|e| WorldError::Db(e.to_string()))
    }
}
