//! Advisory lock entity marking a number/service pairing as consumed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Advisory lock emitted once per order on its first captured OTP.
/// Unlocking is an external operation; the engine never mutates these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    /// Unique identifier for the lock record
    pub id: Uuid,

    /// Locked phone number (digits only)
    pub number: String,

    /// Country of the locked number
    pub country_id: Uuid,

    /// Service the number was consumed for
    pub service_id: Uuid,

    /// Lock state; created locked
    pub locked: bool,

    /// Timestamp when the lock was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,
}

impl Lock {
    /// Creates a new locked record for the given number/country/service triple
    pub fn new(number: String, country_id: Uuid, service_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            number,
            country_id,
            service_id,
            locked: true,
            created_at: now,
            updated_at: now,
        }
    }
}
