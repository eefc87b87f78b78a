//! Scenario error types

use stampede_http::HttpError;
use thiserror::Error;

/// Run-level failures of the harness.
///
/// Per-iteration request failures during the load phase are not errors;
/// they are absorbed into the metrics registry as failure outcomes.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The contended partner could not be created; nothing downstream can run
    #[error("Seed phase failed to create the contended partner")]
    PartnerCreation(#[source] HttpError),

    /// Every order creation call failed; there is nothing to contend over
    #[error("Seed phase created no orders; nothing to contend over")]
    NoOrdersSeeded,

    /// The reconciliation oracle could not obtain ground truth
    #[error("Reconciliation query failed")]
    Reconciliation(#[source] HttpError),

    /// Any other HTTP failure outside the load phase
    #[error(transparent)]
    Http(#[from] HttpError),
}
