//! Target service configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Configuration for the order-approval service under test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the service API, e.g. `http://localhost/restapi/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Marker matched against rejection bodies to detect the service's
    /// insufficient-credit business error
    #[serde(default = "default_insufficient_credit_marker")]
    pub insufficient_credit_marker: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            insufficient_credit_marker: default_insufficient_credit_marker(),
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.base_url, "base_url", self.domain_name())?;
        validate_required_string(
            &self.insufficient_credit_marker,
            "insufficient_credit_marker",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost/restapi/api".to_string()
}

fn default_insufficient_credit_marker() -> String {
    // Fragment of the service's CreditLimitExceededException message
    "crédito suficiente".to_string()
}
