// Configuration loading

use crate::filter::FilterMode;
use crate::models::Priority;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_DIR_NAME: &str = "tasklist";
const CONFIG_FILE_NAME: &str = "config.yml";

/// User settings; every field has a default so partial files are fine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Priority used when the add form leaves it blank
    pub default_priority: Priority,

    /// Filter the session starts on
    pub default_filter: FilterMode,

    /// Tracing level when `--log-level` is not given
    pub log_level: String,

    /// Colorize the rendered list
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_priority: Priority::Medium,
            default_filter: FilterMode::All,
            log_level: "warn".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Load from an explicit path, the user config dir, or fall back to defaults
    ///
    /// An explicit path must exist. The default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::source_path(explicit) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The file `load` reads: the explicit path, else the default path if it exists
    pub fn source_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        }
    }

    /// Parse a YAML config file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(eyre!("Config file not found: {}", path.display()));
        }

        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;

        // An empty file deserializes as null rather than an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!(path = ?path, "Loaded config");
        Ok(config)
    }

    /// `<config_dir>/tasklist/config.yml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}
