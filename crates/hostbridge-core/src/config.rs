//! Repository configuration (`hostbridge.toml`)

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How a repository analyses registered objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BridgeConfig {
    /// Deepest level of complex properties that is analysed. Roots are depth 0.
    /// Children past the limit still get a node, but no members.
    pub max_depth: usize,

    /// Link a property back to its ancestor node when its value is an object
    /// already on the current analysis path, instead of recursing into it.
    pub detect_cycles: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            detect_cycles: true,
        }
    }
}

impl BridgeConfig {
    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a config from a string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "max-depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
