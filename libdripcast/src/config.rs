//! Configuration management for Dripcast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub bluesky: BlueskyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Location of the cached session record.
    pub file: String,
    /// Maximum cached-session age before credential login is forced.
    pub max_age_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: "~/.config/dripcast/session.json".to_string(),
            max_age_hours: crate::session::DEFAULT_MAX_AGE_HOURS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueskyConfig {
    /// PDS service endpoint.
    pub service: String,
}

impl Default for BlueskyConfig {
    fn default() -> Self {
        Self {
            service: "https://bsky.social".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing config file is not an error: the defaults cover a standard
    /// installation and the file only exists to override them.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }
}

impl SessionConfig {
    /// Expand `~` in the configured session file path.
    pub fn expand_file_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.file).to_string())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("DRIPCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("dripcast").join("config.toml"))
}
