//! Configuration loading and environment variable handling

use crate::domains::utils::parse_duration;
use crate::domains::StampedeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "STAMPEDE".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<StampedeConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: StampedeConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<StampedeConfig> {
        let mut config = StampedeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<StampedeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut StampedeConfig) -> ConfigResult<()> {
        if let Ok(workers) = self.get_env_var("WORKERS") {
            config.scenario.workers = self.parse_env("WORKERS", &workers)?;
        }
        if let Ok(duration) = self.get_env_var("DURATION") {
            config.scenario.duration = parse_duration(&duration)
                .map_err(|e| ConfigError::EnvError(format!("Invalid DURATION: {}", e)))?;
        }
        if let Ok(count) = self.get_env_var("ORDER_COUNT") {
            config.scenario.order_count = self.parse_env("ORDER_COUNT", &count)?;
        }
        if let Ok(value) = self.get_env_var("ORDER_UNIT_VALUE") {
            config.scenario.order_unit_value = self.parse_env("ORDER_UNIT_VALUE", &value)?;
        }
        if let Ok(credit) = self.get_env_var("INITIAL_CREDIT") {
            config.scenario.initial_credit = self.parse_env("INITIAL_CREDIT", &credit)?;
        }

        if let Ok(base_url) = self.get_env_var("BASE_URL") {
            config.target.base_url = base_url;
        }
        if let Ok(marker) = self.get_env_var("CREDIT_MARKER") {
            config.target.insufficient_credit_marker = marker;
        }

        if let Ok(rate) = self.get_env_var("FAILURE_RATE_THRESHOLD") {
            config.thresholds.failure_rate_threshold =
                self.parse_env("FAILURE_RATE_THRESHOLD", &rate)?;
        }
        if let Ok(p95) = self.get_env_var("LATENCY_P95_MS") {
            config.thresholds.latency_p95_threshold_ms = self.parse_env("LATENCY_P95_MS", &p95)?;
        }

        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            config.http.timeout = parse_duration(&timeout)
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
        }
        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = serde_yaml::from_str(&level)
                .map_err(|e| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", e)))?;
        }

        Ok(())
    }

    /// Read a prefixed environment variable
    fn get_env_var(&self, suffix: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, suffix))
    }

    fn parse_env<T>(&self, name: &str, raw: &str) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e)))
    }
}
