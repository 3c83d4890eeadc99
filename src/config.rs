//! Configuration management
//!
//! Provides centralized configuration with:
//! - Sensible built-in defaults (no file required)
//! - Optional TOML configuration file
//! - Per-section overrides for logging and platform tooling paths

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Path to the Airport utility on macOS 10.7+
pub const DEFAULT_AIRPORT_PATH: &str =
    "/System/Library/PrivateFrameworks/Apple80211.framework/Resources/airport";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Platform tooling and interface classification
    pub network: NetworkSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Location of the macOS Airport utility used for deassociation
    pub airport_path: String,
    /// Port labels treated as wireless interfaces (lowercase)
    pub wireless_port_names: Vec<String>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            airport_path: DEFAULT_AIRPORT_PATH.to_string(),
            wireless_port_names: crate::mac::WIRELESS_PORT_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file. A missing path
    /// argument means "defaults only"; a named file that does not
    /// exist or does not parse is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("no configuration file given, using defaults");
            return Ok(Self::default());
        };

        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.network.airport_path, DEFAULT_AIRPORT_PATH);
        assert!(config
            .network
            .wireless_port_names
            .contains(&"wi-fi".to_string()));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        // Untouched sections keep their defaults
        assert_eq!(config.network.airport_path, DEFAULT_AIRPORT_PATH);
    }

    #[tokio::test]
    async fn test_load_without_file_uses_defaults() {
        let config = AppConfig::load(None).await.unwrap();
        assert_eq!(config.logging.format, "compact");
    }
}
