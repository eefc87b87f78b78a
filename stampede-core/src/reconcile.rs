//! Reconciliation phase: the post-run conservation oracle
//!
//! Queries the service for ground truth and checks that the partner's final
//! credit matches the conservation law over the approvals that actually
//! happened. Ground truth comes from fresh queries, never from the metrics
//! registry: client-side timeouts can undercount approvals the server-side
//! transaction committed.

use crate::error::ScenarioError;
use crate::seed::SeedSnapshot;
use serde::Serialize;
use stampede_http::{OrderApi, OrderStatus};
use tracing::info;

/// Absolute tolerance for comparing expected and actual credit
pub const CREDIT_TOLERANCE: f64 = 0.01;

/// Outcome of the conservation check
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    /// Approved orders counted by an independent query
    pub approved_count: usize,
    /// Partner credit when seeding finished
    pub initial_credit: f64,
    /// Unit value debited per approved order
    pub order_unit_value: f64,
    /// `initial_credit - approved_count * order_unit_value`
    pub expected_credit: f64,
    /// Partner credit queried fresh after the load phase
    pub actual_credit: f64,
    /// Whether expected and actual agree within [`CREDIT_TOLERANCE`]
    pub passed: bool,
}

impl ReconciliationResult {
    /// Apply the conservation law to independently observed values
    pub fn evaluate(
        initial_credit: f64,
        approved_count: usize,
        order_unit_value: f64,
        actual_credit: f64,
    ) -> Self {
        let expected_credit = initial_credit - approved_count as f64 * order_unit_value;
        Self {
            approved_count,
            initial_credit,
            order_unit_value,
            expected_credit,
            actual_credit,
            passed: (expected_credit - actual_credit).abs() < CREDIT_TOLERANCE,
        }
    }

    /// Absolute difference between expected and actual credit
    pub fn discrepancy(&self) -> f64 {
        (self.expected_credit - self.actual_credit).abs()
    }
}

/// Query ground truth and evaluate the conservation law.
///
/// Must run strictly after every worker has stopped, so the credit being
/// compared is no longer being mutated.
pub async fn reconcile<A: OrderApi + ?Sized>(
    api: &A,
    snapshot: &SeedSnapshot,
) -> Result<ReconciliationResult, ScenarioError> {
    let approved = api
        .list_orders(snapshot.partner_id, OrderStatus::Approved)
        .await
        .map_err(ScenarioError::Reconciliation)?;

    let partner = api
        .get_partner(snapshot.partner_id)
        .await
        .map_err(ScenarioError::Reconciliation)?;

    let result = ReconciliationResult::evaluate(
        snapshot.initial_credit,
        approved.len(),
        snapshot.order_unit_value,
        partner.current_credit,
    );

    info!(
        approved = result.approved_count,
        expected = result.expected_credit,
        actual = result.actual_credit,
        passed = result.passed,
        "Reconciliation complete"
    );

    Ok(result)
}
