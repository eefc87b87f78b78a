//! Threshold evaluation and the final run report

use crate::metrics::MetricsSummary;
use crate::reconcile::ReconciliationResult;
use crate::worker::APPROVE_ORDER_OP;
use serde::Serialize;
use stampede_config::ThresholdsConfig;
use std::fmt::Write as _;

/// Result of evaluating the load-phase thresholds
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdVerdict {
    pub violations: Vec<String>,
}

impl ThresholdVerdict {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Evaluate the configured thresholds against the approval metrics.
///
/// A run with zero classified attempts has a zero failure rate and an empty
/// latency series, so it violates nothing here; whether it proves anything
/// is the reconciliation phase's question.
pub fn evaluate_thresholds(
    summary: &MetricsSummary,
    thresholds: &ThresholdsConfig,
) -> ThresholdVerdict {
    let mut violations = Vec::new();

    if let Some(op) = summary.operation(APPROVE_ORDER_OP) {
        let failure_rate = op.failure_rate();
        if failure_rate > thresholds.failure_rate_threshold {
            violations.push(format!(
                "failure rate {:.4} exceeds threshold {:.4}",
                failure_rate, thresholds.failure_rate_threshold
            ));
        }

        let p95 = op.latency.p95_ms;
        if p95 > thresholds.latency_p95_threshold_ms as f64 {
            violations.push(format!(
                "p95 latency {:.1}ms exceeds threshold {}ms",
                p95, thresholds.latency_p95_threshold_ms
            ));
        }
    }

    ThresholdVerdict { violations }
}

/// Final report of a harness run.
///
/// Threshold violations and the reconciliation verdict are independent
/// signals; both are surfaced and either failing fails the run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub metrics: MetricsSummary,
    pub thresholds: ThresholdVerdict,
    pub reconciliation: ReconciliationResult,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.thresholds.passed() && self.reconciliation.passed
    }

    /// Render the human-readable summary
    pub fn render(&self) -> String {
        let mut out = String::new();

        writeln!(out, "=== Stampede run report ===").ok();
        for (name, op) in &self.metrics.operations {
            writeln!(out, "\nOperation {}:", name).ok();
            writeln!(out, "  Attempts:            {}", op.total()).ok();
            writeln!(out, "  Success:             {}", op.success).ok();
            writeln!(
                out,
                "  Failed:              {} ({:.2}%)",
                op.failure,
                op.failure_rate() * 100.0
            )
            .ok();
            writeln!(out, "  Insufficient credit: {}", op.insufficient_credit).ok();
            if op.latency.samples > 0 {
                writeln!(
                    out,
                    "  Latency: avg {:.1}ms, p50 {:.1}ms, p95 {:.1}ms, p99 {:.1}ms, max {:.1}ms",
                    op.latency.avg_ms,
                    op.latency.p50_ms,
                    op.latency.p95_ms,
                    op.latency.p99_ms,
                    op.latency.max_ms
                )
                .ok();
            }
        }

        writeln!(
            out,
            "\nThresholds: {}",
            if self.thresholds.passed() { "PASS" } else { "FAIL" }
        )
        .ok();
        for violation in &self.thresholds.violations {
            writeln!(out, "  - {}", violation).ok();
        }

        let rec = &self.reconciliation;
        writeln!(
            out,
            "\nReconciliation: {}",
            if rec.passed { "PASS" } else { "FAIL" }
        )
        .ok();
        writeln!(out, "  Initial credit:   {:.2}", rec.initial_credit).ok();
        writeln!(out, "  Approved orders:  {}", rec.approved_count).ok();
        writeln!(out, "  Order unit value: {:.2}", rec.order_unit_value).ok();
        writeln!(out, "  Expected credit:  {:.2}", rec.expected_credit).ok();
        writeln!(out, "  Actual credit:    {:.2}", rec.actual_credit).ok();
        writeln!(out, "  Discrepancy:      {:.2}", rec.discrepancy()).ok();

        writeln!(
            out,
            "\nOverall: {}",
            if self.passed() { "PASS" } else { "FAIL" }
        )
        .ok();

        out
    }
}
