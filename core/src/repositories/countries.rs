//! Country repository trait.

use async_trait::async_trait;

use crate::domain::entities::Country;
use crate::errors::DomainError;

/// Contract for country reference records.
#[async_trait]
pub trait CountryRepository: Send + Sync {
    /// Fetch the country with the given (case-insensitive) name, creating it
    /// when missing. Idempotent.
    async fn get_or_create(&self, name: &str) -> Result<Country, DomainError>;
}
