//! Contention scenario configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the concurrent approval scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Wall-clock duration of the load phase
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_duration"
    )]
    pub duration: Duration,

    /// Number of pending orders to seed against the shared partner
    #[serde(default = "default_order_count")]
    pub order_count: usize,

    /// Unit value of every seeded order
    #[serde(default = "default_order_unit_value")]
    pub order_unit_value: f64,

    /// Initial credit (and credit ceiling) of the shared partner
    #[serde(default = "default_initial_credit")]
    pub initial_credit: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            duration: default_duration(),
            order_count: default_order_count(),
            order_unit_value: default_order_unit_value(),
            initial_credit: default_initial_credit(),
        }
    }
}

impl Validatable for ScenarioConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.workers, "workers", self.domain_name())?;
        validate_positive(self.duration.as_millis(), "duration", self.domain_name())?;
        validate_positive(self.order_count, "order_count", self.domain_name())?;
        validate_positive(
            self.order_unit_value,
            "order_unit_value",
            self.domain_name(),
        )?;

        if self.initial_credit < 0.0 {
            return Err(self.validation_error(format!(
                "initial_credit cannot be negative, got {}",
                self.initial_credit
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenario"
    }
}

// Default value functions
fn default_workers() -> usize {
    500
}

fn default_duration() -> Duration {
    Duration::from_secs(60)
}

fn default_order_count() -> usize {
    500
}

fn default_order_unit_value() -> f64 {
    10.0
}

fn default_initial_credit() -> f64 {
    1_000_000.0
}
