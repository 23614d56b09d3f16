//! Cron status (liveness heartbeat) repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Contract for the per-job last-run heartbeat, upserted by unique job name.
#[async_trait]
pub trait CronStatusRepository: Send + Sync {
    /// Record that the named job ran at `at`
    async fn record_run(&self, name: &str, at: DateTime<Utc>) -> Result<(), DomainError>;
}
