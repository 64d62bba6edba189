use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use lightcycle_core::input::Key;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "LIGHTCYCLE_DUEL_CONFIG";
/// Config file used when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/duel.toml";

/// Errors from reading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("tick_rate must be a positive number of frames per second, got {0}")]
    InvalidTickRate(f32),
}

/// The four steering keys of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMap {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
}

/// Per-player settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub keys: KeyMap,
    /// Index into the 16-color palette.
    pub color_index: u8,
}

/// Data-driven configuration for the duel.
///
/// Field size and cycle speed are fixed in `arena`; only controls, colors and
/// pacing are configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Frames per second.
    pub tick_rate: f32,
    /// Key that restarts the round, keeping scores.
    pub reset_key: Key,
    /// Player 1 first.
    pub players: [PlayerConfig; 2],
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            reset_key: Key::R,
            players: [
                PlayerConfig {
                    keys: KeyMap {
                        up: Key::W,
                        down: Key::S,
                        left: Key::A,
                        right: Key::D,
                    },
                    color_index: 12,
                },
                PlayerConfig {
                    keys: KeyMap {
                        up: Key::ArrowUp,
                        down: Key::ArrowDown,
                        left: Key::ArrowLeft,
                        right: Key::ArrowRight,
                    },
                    color_index: 9,
                },
            ],
        }
    }
}

impl DuelConfig {
    /// Load config from the environment-named file or `config/duel.toml`,
    /// falling back to defaults. A file that exists but is broken is logged
    /// and ignored.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No duel config file, using defaults");
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded duel config");
                config
            },
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring duel config, using defaults");
                Self::default()
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the frame clock cannot pace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.tick_rate;
        if !rate.is_finite() || rate <= 0.0 || Duration::try_from_secs_f32(1.0 / rate).is_err() {
            return Err(ConfigError::InvalidTickRate(rate));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_controls() {
        let config = DuelConfig::default();
        assert_eq!(config.players[0].keys.up, Key::W);
        assert_eq!(config.players[1].keys.left, Key::ArrowLeft);
        assert_eq!(config.reset_key, Key::R);
        assert_eq!(config.players[0].color_index, 12);
        assert_eq!(config.players[1].color_index, 9);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DuelConfig::from_toml_str("tick_rate = 60.0\nreset_key = \"Space\"\n").unwrap();
        assert_eq!(config.tick_rate, 60.0);
        assert_eq!(config.reset_key, Key::Space);
        assert_eq!(config.players, DuelConfig::default().players);
    }

    #[test]
    fn player_keys_from_toml() {
        let toml = r#"
            [[players]]
            color_index = 3
            keys = { up = "KeyI", down = "KeyK", left = "KeyJ", right = "KeyL" }

            [[players]]
            color_index = 8
            keys = { up = "ArrowUp", down = "ArrowDown", left = "ArrowLeft", right = "ArrowRight" }
        "#;
        let config = DuelConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.players[0].keys.up, Key::Letter('I'));
        assert_eq!(config.players[0].color_index, 3);
        assert_eq!(config.players[1].color_index, 8);
    }

    #[test]
    fn bad_key_name_is_an_error() {
        let err = DuelConfig::from_toml_str("reset_key = \"Hyper\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unusable_tick_rates_are_rejected() {
        for rate in ["0.0", "-30.0", "1e-20", "nan", "inf"] {
            let err = DuelConfig::from_toml_str(&format!("tick_rate = {rate}")).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidTickRate(_)),
                "tick_rate = {rate} should be rejected, got {err}"
            );
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(DuelConfig::default().validate().is_ok());
        assert!(DuelConfig::from_toml_str("tick_rate = 0.5").is_ok());
    }

    #[test]
    fn bad_tick_rate_in_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("lightcycle-duel-{}.toml", std::process::id()));
        std::fs::write(&path, "tick_rate = 0.0\n").unwrap();
        let err = DuelConfig::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::InvalidTickRate(rate) if rate == 0.0));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DuelConfig::from_file(Path::new("/nonexistent/duel.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
