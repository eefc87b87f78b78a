//! Core engine of the Stampede contention harness
//!
//! The harness runs in three phases against an order-approval service:
//! a single-threaded seed phase builds one credit-limited partner plus a
//! batch of pending orders, a fixed pool of concurrent workers then races
//! to approve those orders, and a final reconciliation phase independently
//! verifies that the partner's credit obeys the conservation law implied
//! by the approvals that actually happened.

pub mod driver;
pub mod error;
pub mod metrics;
pub mod reconcile;
pub mod report;
pub mod runner;
pub mod seed;
pub mod worker;

// Re-export commonly used types at the crate root
pub use driver::{ConcurrencyDriver, IterationCounter};
pub use error::ScenarioError;
pub use metrics::{MetricsRegistry, MetricsSummary, OperationMetrics};
pub use reconcile::{reconcile, ReconciliationResult, CREDIT_TOLERANCE};
pub use report::{evaluate_thresholds, RunReport, ThresholdVerdict};
pub use runner::ScenarioRunner;
pub use seed::{seed, SeedSnapshot};
pub use worker::{run_iteration, IterationOutcome, RejectionMatcher, APPROVE_ORDER_OP};
