// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON. Every field has a default, so a partial file is valid.

use crate::backends::camera::types::VideoConstraints;
use crate::pipelines::photo::OutputConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the user's config dir
const CONFIG_DIR_NAME: &str = "camera-snapshot";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Constraints used for the first negotiation
    pub video: VideoConstraints,
    /// Snapshot format and quality
    pub output: OutputConfig,
    /// Still image shown by the virtual camera instead of the test pattern
    pub image_source: Option<PathBuf>,
    /// Simulated acquisition latency of the virtual camera, in milliseconds
    pub latency_ms: u64,
}

impl Config {
    /// Default config file location (`~/.config/camera-snapshot/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Read `path`, or the default location when `None`; a missing file
    /// yields the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, String> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, text)
            .map_err(|e| format!("Failed to write config '{}': {}", path.display(), e))?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }
}
