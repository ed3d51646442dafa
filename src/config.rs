//! Configuration file (`config.toml`).
//!
//! Every field has a default, so a missing file or a partial one is fine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extract::DEFAULT_GAME_TYPES;
use crate::extractor::{ExtractorOptions, Jobs};

const APP_DIR: &str = "ircpoker";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub log: LogConfig,
}

/// `[extract]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Outer archive to extract from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Result file, replayed when it already exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Worker threads; -1 uses every core
    pub jobs: i64,
    /// Game types to extract
    pub game_types: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            jobs: 1,
            game_types: DEFAULT_GAME_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when neither `RUST_LOG` nor `-v`/`-q` is given
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/ircpoker/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Extraction options as configured, before command-line overrides.
    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions {
            input: self.extract.input.clone(),
            output: self.extract.output.clone(),
            jobs: Jobs::from_count(self.extract.jobs),
            game_types: self.extract.game_types.iter().cloned().collect(),
        }
    }
}
