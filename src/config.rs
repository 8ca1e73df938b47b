//! On-disk configuration: pin wiring and tick period.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bus::BusPins;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// BCM pins the controller lines are wired to.
    pub pins: BusPins,
    /// Target poll period in microseconds.
    pub tick_period_us: u64,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            pins: BusPins::default(),
            tick_period_us: 16_666,
        }
    }
}

impl PadConfig {
    /// Location of the config file, `None` when the platform has no
    /// config directory.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snespoll").join("config.toml"))
    }

    /// Loads the config file, writing a default one on first run.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let Some(path) = Self::path() else {
            debug!("No config directory on this platform, using defaults");
            return Ok(Self::default());
        };

        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let config = toml::from_str(&raw)?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(&path, toml::to_string_pretty(&config)?)?;
            info!("Wrote default config to {}", path.display());
            Ok(config)
        }
    }
}
