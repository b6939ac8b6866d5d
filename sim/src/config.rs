//! Simulator configuration.
//!
//! Can be loaded from a TOML file via [`SimConfig::from_toml_file`]. Every
//! field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use swarm_types::MarketParams;
use swarm_utils::LogFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Owner of the registry and the staking engine.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Market parameters. A missing table means the testnet values; fields
    /// left out of a present table take the live-network defaults.
    #[serde(default = "MarketParams::testnet_defaults")]
    pub params: MarketParams,
}

fn default_owner() -> String {
    "swm_owner".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            params: MarketParams::testnet_defaults(),
        }
    }
}

impl SimConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
