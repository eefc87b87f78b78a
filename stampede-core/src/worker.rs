//! Worker task: one approval attempt per iteration index

use crate::metrics::OperationMetrics;
use crate::seed::SeedSnapshot;
use stampede_http::{ApiErrorBody, OrderApi, OrderStatus};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Operation name the approval attempts are recorded under
pub const APPROVE_ORDER_OP: &str = "approve_order";

/// Detects the service's insufficient-credit business rejection in a
/// failure response body.
///
/// The service has no structured error code, only an `ErrorDetails` JSON
/// body. The matcher inspects that body's `message` field and falls back to
/// a raw substring match so it keeps working against non-JSON bodies.
#[derive(Debug, Clone)]
pub struct RejectionMatcher {
    marker: String,
}

impl RejectionMatcher {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// True if the body carries the insufficient-credit marker
    pub fn matches(&self, body: &str) -> bool {
        if body.is_empty() {
            return false;
        }
        if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
            return parsed.message.contains(&self.marker);
        }
        body.contains(&self.marker)
    }
}

/// What one call to [`run_iteration`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// An approval attempt was issued and classified
    Completed,
    /// The index is past the seeded orders; nothing was sent or recorded
    OutOfWork,
}

/// Execute one iteration: select the work item for `index`, attempt to
/// approve it, classify the outcome into `metrics`.
///
/// Out-of-range indices are a no-op. A failed attempt is final; retrying
/// would give an order a second approval attempt and invalidate the
/// reconciliation math.
pub async fn run_iteration<A: OrderApi + ?Sized>(
    api: &A,
    snapshot: &SeedSnapshot,
    index: u64,
    metrics: &OperationMetrics,
    rejection: &RejectionMatcher,
) -> IterationOutcome {
    let Some(order_id) = snapshot.order_at(index) else {
        return IterationOutcome::OutOfWork;
    };

    let started = Instant::now();
    match api
        .update_order_status(order_id, OrderStatus::Approved)
        .await
    {
        Ok(transition) if transition.is_success() => {
            metrics.record_success(started.elapsed());
        }
        Ok(transition) => {
            let business_rejection = rejection.matches(&transition.body);
            if business_rejection {
                debug!(order_id, status = transition.status, "Approval rejected: insufficient credit");
            } else {
                error!(
                    order_id,
                    status = transition.status,
                    body = %transition.body,
                    "Approval failed"
                );
            }
            metrics.record_failure(business_rejection);
        }
        Err(err) => {
            warn!(order_id, error = %err, "Approval request failed at transport level");
            metrics.record_failure(false);
        }
    }

    IterationOutcome::Completed
}
