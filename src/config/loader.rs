//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Apply environment overrides for the processor base URLs.
pub fn apply_env_overrides(config: &mut GatewayConfig) {
    if let Ok(url) = std::env::var("PROCESSOR_DEFAULT_URL") {
        config.processors.default_url = url;
    }
    if let Ok(url) = std::env::var("PROCESSOR_FALLBACK_URL") {
        config.processors.fallback_url = url;
    }
}

/// Semantic checks beyond what serde enforces.
pub fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
    if config.queue.capacity == 0 {
        return Err(ConfigError::Invalid("queue.capacity must be at least 1".into()));
    }
    if config.health_check.interval_secs == 0 {
        return Err(ConfigError::Invalid(
            "health_check.interval_secs must be at least 1".into(),
        ));
    }
    for (name, url) in [
        ("processors.default_url", &config.processors.default_url),
        ("processors.fallback_url", &config.processors.fallback_url),
    ] {
        Url::parse(url)
            .map_err(|e| ConfigError::Invalid(format!("{name} is not a valid URL: {e}")))?;
    }
    Ok(())
}
