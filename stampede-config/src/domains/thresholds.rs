//! Pass/fail threshold configuration for the load phase

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_rate, Validatable};
use serde::{Deserialize, Serialize};

/// Thresholds evaluated against the metrics summary after the run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    /// Maximum tolerated failure rate over all classified attempts
    #[serde(default = "default_failure_rate_threshold")]
    pub failure_rate_threshold: f64,

    /// Maximum tolerated 95th-percentile approval latency in milliseconds
    #[serde(default = "default_latency_p95_threshold_ms")]
    pub latency_p95_threshold_ms: u64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: default_failure_rate_threshold(),
            latency_p95_threshold_ms: default_latency_p95_threshold_ms(),
        }
    }
}

impl Validatable for ThresholdsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_rate(
            self.failure_rate_threshold,
            "failure_rate_threshold",
            self.domain_name(),
        )?;
        validate_positive(
            self.latency_p95_threshold_ms,
            "latency_p95_threshold_ms",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "thresholds"
    }
}

// Default value functions
fn default_failure_rate_threshold() -> f64 {
    0.01
}

fn default_latency_p95_threshold_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_defaults_are_valid() {
        assert!(ThresholdsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        let config = ThresholdsConfig {
            failure_rate_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
