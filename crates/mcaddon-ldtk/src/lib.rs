//! LDtk tile map to Bedrock world conversion.
//!
//! Tiles become blocks (an origin block, then the tile's block on top),
//! entities become a script module listing their world positions.

pub mod config;
pub mod converter;
pub mod coords;
pub mod error;
pub mod level;
pub mod source;
pub mod tileset;

pub use config::{ConvertOptions, ConverterConfig};
pub use converter::{run, ConversionReport, ScriptDirectory, ScriptSink, TileWorldConverter};
pub use coords::{map_coordinates, Offset, Plane, WorldPos};
pub use error::ConvertError;
pub use tileset::{BlockCatalog, IdentifierCatalog, TileData};
