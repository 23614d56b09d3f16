//! Inbound SMS message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inbound SMS persisted by the external ingestion endpoint.
/// Read-only from the fulfillment engine's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for the message
    pub id: Uuid,

    /// Sender id as reported by the carrier
    pub sender: String,

    /// Receiving number (full or bare form, as delivered)
    pub receiver: String,

    /// Gateway port the message arrived on
    pub port: Option<String>,

    /// Receive timestamp reported by the gateway
    pub received_at: DateTime<Utc>,

    /// Free-text body
    pub body: String,

    /// Timestamp when the record was persisted
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message received now
    pub fn new(sender: String, receiver: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender,
            receiver,
            port: None,
            received_at: now,
            body,
            created_at: now,
        }
    }
}
