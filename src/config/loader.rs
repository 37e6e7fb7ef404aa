//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading settlement
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{SettlementError, SettlementResult};

use super::types::SettlementConfig;

/// The configuration file name inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "settlement.yaml";

/// Loads and provides access to the settlement configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── settlement.yaml  # Withholding, averaging and bonus constants
/// └── dataset.yaml     # In-memory source data for the bundled server
/// ```
///
/// # Example
///
/// ```no_run
/// use quincena_settlement::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Withholding rate: {}%", loader.config().withholding_rate_percent);
/// # Ok::<(), quincena_settlement::error::SettlementError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SettlementConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `settlement.yaml` is missing or is not valid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> SettlementResult<Self> {
        let config_path = path.as_ref().join(CONFIG_FILE_NAME);
        let config = load_yaml::<SettlementConfig>(&config_path)?;
        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> SettlementConfig {
        self.config
    }
}

/// Loads and parses a YAML file.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> SettlementResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| SettlementError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| SettlementError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config.withholding_rate_percent, Decimal::from(13));
        assert_eq!(config.withholding_threshold, Decimal::from(950_000));
        assert_eq!(config.days_per_period, 15);
        assert_eq!(config.shift_bonus_threshold, 10);
    }

    #[test]
    fn test_loaded_configuration_matches_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.config(), &SettlementConfig::default());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(SettlementError::ConfigNotFound { path }) => {
                assert!(path.contains("settlement.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config: SettlementConfig = serde_yaml::from_str("days_per_period: 14\n").unwrap();
        assert_eq!(config.days_per_period, 14);
        assert_eq!(config.withholding_rate_percent, Decimal::from(13));
    }

    #[test]
    fn test_invalid_yaml_value_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("settlement-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "days_per_period: many\n").unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        match result {
            Err(SettlementError::ConfigParseError { path, message }) => {
                assert!(path.ends_with(CONFIG_FILE_NAME));
                assert!(!message.is_empty());
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
