//! Block states, dimensions and game versions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace assumed for identifiers written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A typed block state property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BlockProperty {
    String(String),
    Int(i32),
    Byte(i8),
}

impl BlockProperty {
    /// Parse a property value: `true`/`false` become bytes, integers become
    /// ints, anything else stays a string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => BlockProperty::Byte(1),
            "false" => BlockProperty::Byte(0),
            _ => raw
                .parse::<i32>()
                .map(BlockProperty::Int)
                .unwrap_or_else(|_| BlockProperty::String(raw.to_string())),
        }
    }
}

/// A block: `namespace:name` plus its state properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, BlockProperty>,
}

impl BlockState {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            properties: BTreeMap::new(),
        }
    }

    /// Parse `namespace:name`; a bare name is placed in the `minecraft` namespace.
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier.split_once(':') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new(DEFAULT_NAMESPACE, identifier),
        }
    }

    pub fn air() -> Self {
        Self::new(DEFAULT_NAMESPACE, "air")
    }

    pub fn with_property(mut self, key: &str, value: BlockProperty) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    /// `namespace:name`
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }

    pub fn is_air(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE && self.name == "air"
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if !self.properties.is_empty() {
            let props: Vec<String> = self
                .properties
                .iter()
                .map(|(k, v)| match v {
                    BlockProperty::String(s) => format!("{k}={s}"),
                    BlockProperty::Int(i) => format!("{k}={i}"),
                    BlockProperty::Byte(b) => format!("{k}={b}b"),
                })
                .collect();
            write!(f, "[{}]", props.join(","))?;
        }
        Ok(())
    }
}

/// A world dimension with its build limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Overworld,
    Nether,
    End,
}

impl Dimension {
    /// Numeric ID used in LevelDB keys.
    pub fn id(self) -> i32 {
        match self {
            Dimension::Overworld => 0,
            Dimension::Nether => 1,
            Dimension::End => 2,
        }
    }

    pub fn from_id(id: i32) -> Option<Dimension> {
        Dimension::all().into_iter().find(|d| d.id() == id)
    }

    pub fn all() -> [Dimension; 3] {
        [Dimension::Overworld, Dimension::Nether, Dimension::End]
    }

    /// Lowest buildable Y.
    pub fn min_y(self) -> i32 {
        match self {
            Dimension::Overworld => -64,
            Dimension::Nether | Dimension::End => 0,
        }
    }

    /// Number of 16-block sub-chunks in a column.
    pub fn sub_chunk_count(self) -> usize {
        match self {
            Dimension::Overworld => 24,
            Dimension::Nether => 8,
            Dimension::End => 16,
        }
    }

    /// One past the highest buildable Y.
    pub fn max_y(self) -> i32 {
        self.min_y() + self.sub_chunk_count() as i32 * 16
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Overworld => "overworld",
            Dimension::Nether => "nether",
            Dimension::End => "end",
        })
    }
}

/// The platform and version a block state is written for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    pub platform: String,
    /// `[major, minor, patch, revision]`
    pub version: [u8; 4],
}

impl GameVersion {
    pub fn bedrock(version: [u8; 4]) -> Self {
        Self {
            platform: "bedrock".into(),
            version,
        }
    }

    /// Packed block state version as stored in block NBT, e.g. 1.20.50.1 -> 18_100_737.
    pub fn block_state_version(&self) -> i32 {
        let [major, minor, patch, revision] = self.version;
        (major as i32) << 24 | (minor as i32) << 16 | (patch as i32) << 8 | revision as i32
    }
}

impl Default for GameVersion {
    fn default() -> Self {
        Self::bedrock([1, 20, 50, 1])
    }
}
