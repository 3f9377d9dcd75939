//! EpicChain Configuration Module
//!
//! Configuration types for the EpicChain storage node, loaded from a TOML
//! file with `[storage]` and `[logging]` sections. Missing sections and
//! fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Log levels accepted in `[logging] level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Log formats accepted in `[logging] format`.
pub const LOG_FORMATS: &[&str] = &["text", "json", "pretty"];

/// Errors raised while loading or validating a node configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub storage: StorageSection,
    pub logging: LoggingSection,
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Store provider name. Empty selects the default in-memory engine.
    pub engine: String,
    /// Store path handed to the provider. The memory engine ignores it.
    pub path: String,
    /// Open a read-only view of the store only.
    pub read_only: bool,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub active: bool,
    pub level: String,
    pub format: String,
    pub console_output: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            active: true,
            level: "info".to_string(),
            format: "text".to_string(),
            console_output: true,
        }
    }
}

impl NodeConfig {
    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Rejects unknown log levels and formats.
    pub fn validate(&self) -> ConfigResult<()> {
        self.logging.validate()
    }
}

impl LoggingSection {
    pub fn validate(&self) -> ConfigResult<()> {
        let level = self.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown logging level '{}' (expected one of {})",
                self.level,
                LOG_LEVELS.join(", ")
            )));
        }

        let format = self.format.trim().to_ascii_lowercase();
        if !LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown logging format '{}' (expected one of {})",
                self.format,
                LOG_FORMATS.join(", ")
            )));
        }
        Ok(())
    }
}
