//! Runtime configuration, built explicitly from environment variables.

use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_GAS_LIMIT: u64 = 3_135_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Crate configuration. Construct with [`Config::from_env`] or take
/// [`Config::default`] in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Gas limit assumed when sizing trades (`AUGURY_DEFAULT_GAS_LIMIT`).
    pub default_gas_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(&std::env::vars().collect())
    }

    pub fn from_env_map(env: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(value) = env.get("AUGURY_DEFAULT_GAS_LIMIT") {
            config.default_gas_limit =
                value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "AUGURY_DEFAULT_GAS_LIMIT".to_string(),
                    value: value.clone(),
                })?;
        }
        Ok(config)
    }
}
