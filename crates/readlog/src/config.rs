//! Configuration file support for readlog.
//!
//! Loads `readlog.toml` from the working directory, falling back to the
//! global config at `{config_dir}/readlog/config.toml`. Command-line flags
//! override both.

use anyhow::{Context, Result};
use readlog_core::Orientation;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings shared by every view. All keys are optional.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReadlogConfig {
    /// Path to the reading-log CSV export
    pub csv: Option<PathBuf>,
    /// Directory holding `{book_id}.jpg` covers
    pub covers_dir: Option<PathBuf>,
    /// Display name used in heatmap titles
    pub name: Option<String>,
    /// Heatmap orientation
    pub orientation: Option<Orientation>,
    /// Animation frame duration in milliseconds
    pub frame_duration_ms: Option<u64>,
    /// Maximum covers per row in the monthly grid
    pub grid_columns: Option<usize>,
}

/// The project config file name
pub const CONFIG_FILE_NAME: &str = "readlog.toml";

/// Directory under the platform config dir holding the global config
pub const GLOBAL_CONFIG_DIR: &str = "readlog";

/// The global config file name
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

impl ReadlogConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        Self::load_file(&working_dir.join(CONFIG_FILE_NAME))
    }

    /// Load the global config, if there is one.
    pub fn load_global() -> Result<Option<Self>> {
        match Self::global_path() {
            Some(path) => Self::load_file(&path),
            None => Ok(None),
        }
    }

    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
    }

    fn load_file(config_path: &Path) -> Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ReadlogConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Project config layered over the global one.
    pub fn resolve(working_dir: &Path) -> Result<Self> {
        let project = Self::load(working_dir)?.unwrap_or_default();
        let global = Self::load_global()?.unwrap_or_default();
        Ok(project.or(global))
    }

    /// Fill every unset key from `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            csv: self.csv.or(fallback.csv),
            covers_dir: self.covers_dir.or(fallback.covers_dir),
            name: self.name.or(fallback.name),
            orientation: self.orientation.or(fallback.orientation),
            frame_duration_ms: self.frame_duration_ms.or(fallback.frame_duration_ms),
            grid_columns: self.grid_columns.or(fallback.grid_columns),
        }
    }
}
