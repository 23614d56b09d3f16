//! Lock repository trait.

use async_trait::async_trait;

use crate::domain::entities::Lock;
use crate::errors::DomainError;

/// Write-only contract for advisory lock records.
#[async_trait]
pub trait LockRepository: Send + Sync {
    /// Create a lock record. Fire-and-forget from the engine's perspective;
    /// failures are logged by the caller, never retried.
    async fn create(&self, lock: Lock) -> Result<(), DomainError>;
}
