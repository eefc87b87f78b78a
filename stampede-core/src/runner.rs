//! Scenario runner: ties the three phases together

use crate::driver::ConcurrencyDriver;
use crate::error::ScenarioError;
use crate::metrics::MetricsRegistry;
use crate::reconcile::reconcile;
use crate::report::{evaluate_thresholds, RunReport};
use crate::seed::seed;
use crate::worker::RejectionMatcher;
use stampede_config::StampedeConfig;
use stampede_http::OrderApi;
use std::sync::Arc;

/// Executes a full seed → drive → reconcile run against one service
pub struct ScenarioRunner {
    config: StampedeConfig,
}

impl ScenarioRunner {
    pub fn new(config: StampedeConfig) -> Self {
        Self { config }
    }

    /// Run the whole scenario and assemble the final report.
    ///
    /// Seed failures abort before any worker starts. The reconciliation
    /// phase only begins once the driver has joined every worker, so ground
    /// truth is read from a quiescent service.
    pub async fn run<A>(&self, api: Arc<A>) -> Result<RunReport, ScenarioError>
    where
        A: OrderApi + ?Sized + 'static,
    {
        let snapshot = Arc::new(seed(api.as_ref(), &self.config.scenario).await?);

        let metrics = Arc::new(MetricsRegistry::new());
        let driver = ConcurrencyDriver::new(
            self.config.scenario.workers,
            self.config.scenario.duration,
        );
        let rejection =
            RejectionMatcher::new(self.config.target.insufficient_credit_marker.clone());

        driver
            .run(
                Arc::clone(&api),
                Arc::clone(&snapshot),
                Arc::clone(&metrics),
                rejection,
            )
            .await;

        let reconciliation = reconcile(api.as_ref(), &snapshot).await?;
        let summary = metrics.snapshot();
        let thresholds = evaluate_thresholds(&summary, &self.config.thresholds);

        Ok(RunReport {
            metrics: summary,
            thresholds,
            reconciliation,
        })
    }
}
