//! Order repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::Order;
use crate::errors::DomainError;

/// Persistence contract for orders.
///
/// Mutations are expressed as targeted per-record conditional updates, never
/// read-modify-write, because the admin surface may concurrently toggle
/// `active` or delete records.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Load every order with `active = true`
    async fn find_active(&self) -> Result<Vec<Order>, DomainError>;

    /// Clear the `active` flag on one order (terminal transition)
    ///
    /// A no-op when the order is already inactive or gone.
    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError>;

    /// Record a captured message body on one order.
    ///
    /// Appends `body` with set semantics (exact-text dedup), clears the
    /// `next_sms` gate, bumps `updated_at`, and sets `is_used = true` when
    /// `first_capture`.
    ///
    /// # Returns
    /// * `Ok(true)` - the body was newly appended
    /// * `Ok(false)` - the exact body was already captured
    async fn record_capture(
        &self,
        id: Uuid,
        body: &str,
        first_capture: bool,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;
}
