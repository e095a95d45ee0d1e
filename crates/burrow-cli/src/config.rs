//! Harness configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the persisted prefix catalogue
    pub catalogue_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalogue_path: "~/.burrow/catalogue.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Expand ~ in the catalogue path
    pub fn catalogue_path(&self) -> PathBuf {
        expand_path(&self.catalogue_path)
    }
}

/// Expand ~ at the start of a path
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}
