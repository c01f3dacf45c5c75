//! Active-cluster state persisted between invocations.

use crate::error::{IcError, Result};
use crate::types::ClusterHandle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    #[serde(default)]
    pub cluster: Option<ClusterHandle>,
}

impl ClusterState {
    /// Load state; a missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| IcError::TomlDe(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| IcError::TomlSer(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<base_dir>/state.toml`
    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join("state.toml")
    }
}
