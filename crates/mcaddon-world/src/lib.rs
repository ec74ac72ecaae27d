//! Chunked voxel storage: block states, chunk columns and a LevelDB-backed store.

pub mod block;
pub mod block_hash;
pub mod chunk;
pub mod error;
pub mod storage;
pub mod store;

pub use block::{BlockProperty, BlockState, Dimension, GameVersion};
pub use error::WorldError;
pub use store::{LevelDbWorld, VoxelStore};
