//! Destinations for generated pack files.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::ControllerError;

/// Accepts a JSON document and stores it at a pack-relative path.
pub trait JsonSink {
    fn write_json(&mut self, relative_path: &Path, document: &Value) -> Result<(), ControllerError>;
}

/// Writes pretty-printed JSON files below a pack root directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl JsonSink for DirectorySink {
    fn write_json(&mut self, relative_path: &Path, document: &Value) -> Result<(), ControllerError> {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(document)?;
        std::fs::write(&path, contents)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
