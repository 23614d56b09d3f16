//! MySQL implementation of the PanelRepository trait.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use sg_core::domain::entities::Panel;
use sg_core::errors::DomainError;
use sg_core::repositories::PanelRepository;

use super::db_err;

/// Read-only MySQL view over the panel configuration.
pub struct MySqlPanelRepository {
    pool: MySqlPool,
}

impl MySqlPanelRepository {
    /// Create a new MySQL panel repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PanelRepository for MySqlPanelRepository {
    async fn find_by_code(&self, code: u32) -> Result<Option<Panel>, DomainError> {
        let row = sqlx::query("SELECT code, url FROM panels WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("find panel", e))?;

        row.map(|row| {
            Ok(Panel {
                code: row.try_get("code").map_err(|e| db_err("panel code", e))?,
                url: row.try_get("url").map_err(|e| db_err("panel url", e))?,
            })
        })
        .transpose()
    }
}
