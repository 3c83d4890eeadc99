//! Logging initialization
//!
//! Structured console logging on stderr via tracing, with the level
//! and format taken from configuration and overridable through the
//! standard environment filter.

use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::{config::LoggingConfig, error::SpoofError};

/// Initialize the logging system based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config.level)?;
    let registry = Registry::default().with(env_filter);

    match config.format.as_str() {
        "pretty" => {
            let console_layer = fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_target(false);
            registry.with(console_layer).init();
        }
        _ => {
            let console_layer = fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false);
            registry.with(console_layer).init();
        }
    }

    Ok(())
}

/// Create environment filter from log level string
fn create_env_filter(level: &str) -> Result<EnvFilter> {
    let base_level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            return Err(SpoofError::config(format!("invalid log level: {}", level)).into());
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(base_level.into())
        .from_env_lossy();

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_levels() {
        for level in ["trace", "debug", "info", "warn", "error", "WARN"] {
            assert!(create_env_filter(level).is_ok());
        }
    }

    #[test]
    fn test_invalid_level() {
        assert!(create_env_filter("verbose").is_err());
    }
}
