//! Domain-specific configuration modules

pub mod http;
pub mod logging;
pub mod scenario;
pub mod target;
pub mod thresholds;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main Stampede configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StampedeConfig {
    /// Contention scenario parameters
    #[serde(default)]
    pub scenario: scenario::ScenarioConfig,

    /// Service under test
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Load-phase pass/fail thresholds
    #[serde(default)]
    pub thresholds: thresholds::ThresholdsConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl StampedeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.scenario.validate()?;
        self.target.validate()?;
        self.thresholds.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a commented sample configuration file
    pub fn sample_yaml() -> String {
        let sample = Self::default();
        let body = serde_yaml::to_string(&sample).unwrap_or_default();
        format!(
            "# Stampede configuration\n# All values shown are the defaults; every field may also be\n# overridden with a STAMPEDE_* environment variable.\n{}",
            body
        )
    }
}
