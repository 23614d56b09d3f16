//! Message repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::Message;
use crate::errors::DomainError;

/// Query describing which inbound messages are candidates for one order
/// on one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    /// Full dialed number, e.g. `+919876543210`
    pub full_number: String,

    /// Bare number without the dial code
    pub bare_number: String,

    /// Lookback boundary; only messages received after this instant qualify
    pub since: DateTime<Utc>,
}

/// Read-only contract for the inbound message store.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find messages received after `query.since` whose receiver equals the
    /// full or bare number, or whose body contains either form as a
    /// case-insensitive substring. Sorted ascending by receive time.
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Message>, DomainError>;
}
