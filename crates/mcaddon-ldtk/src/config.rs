use serde::Deserialize;
use std::path::{Path, PathBuf};

use mcaddon_world::{Dimension, GameVersion};

use crate::coords::{Offset, Plane};
use crate::error::ConvertError;

/// Conversion settings, usually read from a TOML file.
#[derive(Debug, Deserialize)]
pub struct ConverterConfig {
    pub source: SourceSection,
    pub world: WorldSection,
    #[serde(default)]
    pub convert: ConvertSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Deserialize)]
pub struct SourceSection {
    /// Path of the `.ldtk` project.
    pub path: PathBuf,
    /// Namespace given to non-vanilla entities.
    pub namespace: String,
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    /// LevelDB directory of the target world.
    pub path: PathBuf,
    /// Delete every existing chunk of the dimension before converting.
    #[serde(default)]
    pub clear: bool,
    #[serde(default = "default_dimension")]
    pub dimension: Dimension,
    #[serde(default = "default_version")]
    pub version: [u8; 4],
}

fn default_dimension() -> Dimension {
    Dimension::Overworld
}

fn default_version() -> [u8; 4] {
    GameVersion::default().version
}

#[derive(Debug, Deserialize)]
pub struct ConvertSection {
    #[serde(default = "default_plane")]
    pub plane: String,
    #[serde(default)]
    pub offset: [i32; 3],
    #[serde(default = "default_export_entities")]
    pub export_entities: bool,
}

fn default_plane() -> String {
    "xz".into()
}

fn default_export_entities() -> bool {
    true
}

impl Default for ConvertSection {
    fn default() -> Self {
        Self {
            plane: default_plane(),
            offset: [0; 3],
            export_entities: default_export_entities(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Directory the entity manifest script is written to.
    #[serde(default = "default_script_dir")]
    pub script_dir: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Name of the exported constant.
    #[serde(default = "default_export_name")]
    pub export_name: String,
}

fn default_script_dir() -> PathBuf {
    "scripts".into()
}

fn default_file_name() -> String {
    "ldtk_levels.js".into()
}

fn default_export_name() -> String {
    "ldtk_levels".into()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            script_dir: default_script_dir(),
            file_name: default_file_name(),
            export_name: default_export_name(),
        }
    }
}

/// Everything [`crate::TileWorldConverter::convert`] needs besides the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub plane: Plane,
    pub offset: Offset,
    pub export_entities: bool,
    pub clear: bool,
    pub dimension: Dimension,
    pub version: GameVersion,
    pub file_name: String,
    pub export_name: String,
}

impl ConvertOptions {
    pub fn new(plane: Plane, offset: Offset, export_entities: bool) -> Self {
        Self {
            plane,
            offset,
            export_entities,
            clear: false,
            dimension: Dimension::Overworld,
            version: GameVersion::default(),
            file_name: default_file_name(),
            export_name: default_export_name(),
        }
    }
}

impl ConverterConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConvertError> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve the conversion options; fails on an unsupported plane.
    pub fn options(&self) -> Result<ConvertOptions, ConvertError> {
        Ok(ConvertOptions {
            plane: self.convert.plane.parse()?,
            offset: Offset::from(self.convert.offset),
            export_entities: self.convert.export_entities,
            clear: self.world.clear,
            dimension: self.world.dimension,
            version: GameVersion::bedrock(self.world.version),
            file_name: self.output.file_name.clone(),
            export_name: self.output.export_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = ConverterConfig::parse(
            r#"
            [source]
            path = "maps/world.ldtk"
            namespace = "demo"

            [world]
            path = "worlds/demo/db"
        "#,
        )
        .unwrap();
        assert_eq!(config.source.namespace, "demo");
        assert!(!config.world.clear);
        assert_eq!(config.world.dimension, Dimension::Overworld);
        assert_eq!(config.convert.plane, "xz");
        assert!(config.convert.export_entities);
        assert_eq!(config.output.script_dir, PathBuf::from("scripts"));

        let options = config.options().unwrap();
        assert_eq!(options.plane, Plane::Horizontal);
        assert_eq!(options.offset, Offset::default());
        assert_eq!(options.version, GameVersion::default());
    }

    #[test]
    fn parse_full_config() {
        let config = ConverterConfig::parse(
            r#"
            [source]
            path = "maps/world.ldtk"
            namespace = "demo"

            [world]
            path = "worlds/demo/db"
            clear = true
            dimension = "nether"
            version = [1, 21, 0, 1]

            [convert]
            plane = "yx"
            offset = [8, 70, -4]
            export_entities = false

            [output]
            script_dir = "bp/scripts"
            file_name = "levels.js"
            export_name = "LEVELS"
        "#,
        )
        .unwrap();
        let options = config.options().unwrap();
        assert!(options.clear);
        assert_eq!(options.dimension, Dimension::Nether);
        assert_eq!(options.plane, Plane::Vertical);
        assert_eq!(options.offset, Offset::from([8, 70, -4]));
        assert!(!options.export_entities);
        assert_eq!(options.version.version, [1, 21, 0, 1]);
        assert_eq!(options.export_name, "LEVELS");
    }

    #[test]
    fn bad_plane_is_a_config_error() {
        let config = ConverterConfig::parse(
            r#"
            [source]
            path = "a.ldtk"
            namespace = "demo"
            [world]
            path = "db"
            [convert]
            plane = "diagonal"
        "#,
        )
        .unwrap();
        assert!(matches!(
            config.options(),
            Err(ConvertError::UnsupportedPlane(_))
        ));
    }

    #[test]
    fn missing_section_fails() {
        assert!(matches!(
            ConverterConfig::parse("[source]\npath = \"a\"\nnamespace = \"b\"\n"),
            Err(ConvertError::Config(_))
        ));
    }
}
