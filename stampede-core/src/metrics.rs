//! Outcome counters and latency tracking for the load phase
//!
//! The registry is an injected instance, never a process-wide global, so
//! independent runs (and the test suite) cannot interfere with each other.
//! Workers write counters lock-free during the run; the summary is read
//! exactly once after every worker has stopped.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

/// Per-operation outcome counters and latency series
#[derive(Debug, Default)]
pub struct OperationMetrics {
    success: AtomicU64,
    failure: AtomicU64,
    insufficient_credit: AtomicU64,
    latencies_us: Mutex<Vec<u64>>,
}

impl OperationMetrics {
    /// Record a successful attempt and its round-trip latency
    pub fn record_success(&self, latency: Duration) {
        self.success.fetch_add(1, Ordering::Relaxed);
        self.latencies_us
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(latency.as_micros() as u64);
    }

    /// Record a failed attempt; `business_rejection` marks the
    /// insufficient-credit sub-case
    pub fn record_failure(&self, business_rejection: bool) {
        self.failure.fetch_add(1, Ordering::Relaxed);
        if business_rejection {
            self.insufficient_credit.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn success_count(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure.load(Ordering::Relaxed)
    }

    pub fn insufficient_credit_count(&self) -> u64 {
        self.insufficient_credit.load(Ordering::Relaxed)
    }

    fn summarize(&self) -> OperationSummary {
        let mut latencies = self
            .latencies_us
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        latencies.sort_unstable();

        OperationSummary {
            success: self.success_count(),
            failure: self.failure_count(),
            insufficient_credit: self.insufficient_credit_count(),
            latency: LatencySummary::from_sorted_micros(&latencies),
        }
    }
}

/// Registry of operation metrics keyed by operation name
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    operations: RwLock<HashMap<String, Arc<OperationMetrics>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the metrics handle for an operation.
    ///
    /// Workers call this once before their loop and then record through the
    /// returned handle without touching the registry lock again.
    pub fn operation(&self, name: &str) -> Arc<OperationMetrics> {
        if let Some(metrics) = self
            .operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(metrics);
        }

        let mut operations = self
            .operations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            operations
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(OperationMetrics::default())),
        )
    }

    /// Produce the end-of-run summary. Call only after all workers stopped.
    pub fn snapshot(&self) -> MetricsSummary {
        let operations = self
            .operations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        MetricsSummary {
            operations: operations
                .iter()
                .map(|(name, metrics)| (name.clone(), metrics.summarize()))
                .collect(),
        }
    }
}

/// Aggregated per-operation results for the final report
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub operations: BTreeMap<String, OperationSummary>,
}

impl MetricsSummary {
    pub fn operation(&self, name: &str) -> Option<&OperationSummary> {
        self.operations.get(name)
    }
}

/// Totals and latency distribution of one operation
#[derive(Debug, Clone, Serialize)]
pub struct OperationSummary {
    pub success: u64,
    pub failure: u64,
    pub insufficient_credit: u64,
    pub latency: LatencySummary,
}

impl OperationSummary {
    /// All classified attempts
    pub fn total(&self) -> u64 {
        self.success + self.failure
    }

    /// Fraction of classified attempts that failed
    pub fn failure_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.failure as f64 / self.total() as f64
    }
}

/// Latency distribution in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct LatencySummary {
    pub samples: usize,
    pub min_ms: f64,
    pub avg_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    fn from_sorted_micros(sorted: &[u64]) -> Self {
        if sorted.is_empty() {
            return Self::default();
        }

        let to_ms = |us: u64| us as f64 / 1000.0;
        let percentile = |p: usize| {
            let idx = (sorted.len() * p / 100).min(sorted.len() - 1);
            to_ms(sorted[idx])
        };

        Self {
            samples: sorted.len(),
            min_ms: to_ms(sorted[0]),
            avg_ms: to_ms(sorted.iter().sum::<u64>() / sorted.len() as u64),
            p50_ms: percentile(50),
            p95_ms: percentile(95),
            p99_ms: percentile(99),
            max_ms: to_ms(sorted[sorted.len() - 1]),
        }
    }
}
