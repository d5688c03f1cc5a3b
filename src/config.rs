//! Optional YAML configuration.
//!
//! Every field has a default so a missing file (or an empty one) behaves the
//! same as no configuration at all.

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    /// Token document to load instead of the bundled one.
    #[serde(default)]
    pub tokens_file: Option<PathBuf>,
    /// Directory for the structured JSONL log.
    #[serde(default)]
    pub logs_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
        }
    }
}

fn default_project_name() -> String {
    "deepcode".to_string()
}

impl UiConfig {
    /// Loads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise the default location; an absent
    /// default file yields the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = paths::config_path()?;
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    tracing::debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }
}
