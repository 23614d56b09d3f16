//! Number inventory repository trait.

use async_trait::async_trait;

use crate::domain::entities::PortTelemetry;
use crate::errors::DomainError;

/// Whether an upsert created a new record or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Persistence contract for the number inventory, keyed by phone number.
#[async_trait]
pub trait NumberRepository: Send + Sync {
    /// Upsert the live telemetry for one number (keyed by `telemetry.number`),
    /// creating the inventory record when it does not exist yet.
    async fn upsert_telemetry(
        &self,
        telemetry: &PortTelemetry,
    ) -> Result<UpsertOutcome, DomainError>;

    /// Mark every number NOT in `seen` as `active = false, signal = 0`.
    /// Absence from the gateway feed is treated as gone, not unknown.
    ///
    /// # Returns
    /// The count of records modified.
    async fn deactivate_missing(&self, seen: &[String]) -> Result<u64, DomainError>;
}
