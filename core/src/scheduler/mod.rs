//! Fixed-interval poller scheduling with an overlap guard.
//!
//! Each poller owns a single-slot in-flight flag: when a tick fires while
//! the previous tick for the same poller is still running, the new tick is
//! skipped entirely - no queuing, no backlog. Pollers are mutually
//! independent; there is no cross-poller locking.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::errors::DomainResult;

/// One scheduled background job.
///
/// `run_tick` owns its whole tick: any per-unit error isolation, I/O
/// timeouts, and the liveness heartbeat happen inside it. Returning an
/// error marks the tick as failed but never stops the schedule.
#[async_trait]
pub trait PollerJob: Send + Sync {
    /// Job name used in logs
    fn name(&self) -> &str;

    /// Execute one tick
    async fn run_tick(&self) -> DomainResult<()>;
}

/// Outcome of one scheduling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick body ran to completion
    Completed,
    /// The tick body returned an error (already logged)
    Failed,
    /// A previous tick was still in flight; no work performed
    Skipped,
}

/// Fixed-interval scheduler for one [`PollerJob`].
pub struct Poller<J: PollerJob> {
    job: Arc<J>,
    interval: Duration,
    in_flight: AtomicBool,
}

/// Releases the in-flight slot even if the tick body panics or is cancelled.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<J: PollerJob> Poller<J> {
    /// Create a poller firing every `interval`
    pub fn new(job: Arc<J>, interval: Duration) -> Self {
        Self {
            job,
            interval,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one tick if no previous tick is still in flight.
    pub async fn tick_once(&self) -> TickOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(job = self.job.name(), "previous tick still in progress, skipping");
            return TickOutcome::Skipped;
        }
        let _guard = InFlightGuard(&self.in_flight);

        match self.job.run_tick().await {
            Ok(()) => TickOutcome::Completed,
            Err(e) => {
                error!(job = self.job.name(), error = %e, "tick failed");
                TickOutcome::Failed
            }
        }
    }

    /// Fire the job on schedule forever. Errors are contained per tick;
    /// nothing propagates to the caller.
    pub async fn run(self: Arc<Self>) {
        info!(
            job = self.job.name(),
            interval_secs = self.interval.as_secs(),
            "poller started"
        );
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            self.tick_once().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Job that blocks until released, counting how many bodies ran
    struct BlockingJob {
        release: Notify,
        runs: AtomicUsize,
    }

    impl BlockingJob {
        fn new() -> Self {
            Self {
                release: Notify::new(),
                runs: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PollerJob for BlockingJob {
        fn name(&self) -> &str {
            "blocking"
        }

        async fn run_tick(&self) -> DomainResult<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(())
        }
    }

    struct FailingJob;

    #[async_trait]
    impl PollerJob for FailingJob {
        fn name(&self) -> &str {
            "failing"
        }

        async fn run_tick(&self) -> DomainResult<()> {
            Err(DomainError::Internal {
                message: "boom".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_overlapping_tick_is_skipped() {
        let job = Arc::new(BlockingJob::new());
        let poller = Arc::new(Poller::new(job.clone(), Duration::from_secs(5)));

        let first = {
            let poller = poller.clone();
            tokio::spawn(async move { poller.tick_once().await })
        };
        // Wait until the first tick body is actually inside the job
        while job.runs.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert_eq!(poller.tick_once().await, TickOutcome::Skipped);
        assert_eq!(job.runs.load(Ordering::SeqCst), 1, "second tick did no work");

        job.release.notify_one();
        assert_eq!(first.await.unwrap(), TickOutcome::Completed);

        // Slot is free again after completion
        job.release.notify_one();
        let poller2 = poller.clone();
        let second = tokio::spawn(async move { poller2.tick_once().await });
        while job.runs.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        job.release.notify_one();
        assert_eq!(second.await.unwrap(), TickOutcome::Completed);
    }

    #[tokio::test]
    async fn test_failed_tick_releases_slot() {
        let poller = Poller::new(Arc::new(FailingJob), Duration::from_secs(5));
        assert_eq!(poller.tick_once().await, TickOutcome::Failed);
        assert_eq!(poller.tick_once().await, TickOutcome::Failed);
    }
}
