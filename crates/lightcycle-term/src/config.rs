use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TermError;

/// Environment variable naming the host's TOML config file.
pub const CONFIG_ENV: &str = "LIGHTCYCLE_TERM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/term.toml";

/// Terminal host configuration, loaded from `config/term.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Field pixels per terminal column, and per half row.
    pub scale: u16,
    /// Where logs go; the terminal itself belongs to the renderer.
    pub log_file: PathBuf,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            log_file: PathBuf::from("lightcycle.log"),
        }
    }
}

impl TermConfig {
    /// Load from the environment-named file or `config/term.toml`, falling
    /// back to defaults. Runs before logging is up, so problems are returned
    /// rather than logged.
    pub fn load() -> Result<Self, TermError> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, TermError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TermError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, TermError> {
        let mut config: Self = toml::from_str(contents)?;
        config.scale = config.scale.max(1);
        Ok(config)
    }
}
