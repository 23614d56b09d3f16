//! Panel configuration repository trait.

use async_trait::async_trait;

use crate::domain::entities::Panel;
use crate::errors::DomainError;

/// Read-only contract for the gateway panel configuration.
#[async_trait]
pub trait PanelRepository: Send + Sync {
    /// Fetch the panel record with the given code
    async fn find_by_code(&self, code: u32) -> Result<Option<Panel>, DomainError>;
}
