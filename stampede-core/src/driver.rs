//! Concurrency driver: fixed worker pool over a shared index allocator

use crate::metrics::MetricsRegistry;
use crate::seed::SeedSnapshot;
use crate::worker::{run_iteration, IterationOutcome, RejectionMatcher, APPROVE_ORDER_OP};
use stampede_http::OrderApi;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Shared monotonic index allocator.
///
/// Hands out globally unique, strictly increasing iteration indices across
/// all workers, which keeps the index-to-order mapping a collision-free
/// partition of the snapshot's order sequence.
#[derive(Debug, Default)]
pub struct IterationCounter {
    next: AtomicU64,
}

impl IterationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next iteration index
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of indices handed out so far
    pub fn assigned(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

/// Runs a fixed pool of workers for a fixed wall-clock duration
#[derive(Debug, Clone)]
pub struct ConcurrencyDriver {
    workers: usize,
    duration: Duration,
}

impl ConcurrencyDriver {
    pub fn new(workers: usize, duration: Duration) -> Self {
        Self { workers, duration }
    }

    /// Run the load phase to completion.
    ///
    /// Every worker repeatedly claims an index from the shared allocator and
    /// executes one iteration for it. No new iteration starts after the
    /// deadline, but an in-flight request is always allowed to finish, so
    /// no ambiguous partial outcome is ever recorded. A worker that draws an
    /// index past the seeded orders retires: the allocator is monotonic, so
    /// every index it would draw afterwards is out of range too.
    ///
    /// Returns the shared counter so callers can see how many iterations
    /// were assigned.
    pub async fn run<A>(
        &self,
        api: Arc<A>,
        snapshot: Arc<SeedSnapshot>,
        metrics: Arc<MetricsRegistry>,
        rejection: RejectionMatcher,
    ) -> Arc<IterationCounter>
    where
        A: OrderApi + ?Sized + 'static,
    {
        let counter = Arc::new(IterationCounter::new());
        let approve = metrics.operation(APPROVE_ORDER_OP);
        let deadline = Instant::now() + self.duration;

        info!(
            workers = self.workers,
            duration_secs = self.duration.as_secs_f64(),
            orders = snapshot.len(),
            "Load phase: starting worker pool"
        );

        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let api = Arc::clone(&api);
            let snapshot = Arc::clone(&snapshot);
            let approve = Arc::clone(&approve);
            let counter = Arc::clone(&counter);
            let rejection = rejection.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    if Instant::now() >= deadline {
                        debug!(worker_id, "deadline reached, stopping");
                        break;
                    }

                    let index = counter.next();
                    let outcome =
                        run_iteration(api.as_ref(), &snapshot, index, &approve, &rejection).await;
                    if outcome == IterationOutcome::OutOfWork {
                        debug!(worker_id, index, "work exhausted, retiring");
                        break;
                    }
                }
            }));
        }

        // Fan-in: wait for every worker, in-flight requests included
        for handle in handles {
            let _ = handle.await;
        }

        info!(
            assigned = counter.assigned(),
            "Load phase: all workers stopped"
        );
        counter
    }
}
