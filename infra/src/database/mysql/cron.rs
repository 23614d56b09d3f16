//! MySQL implementation of the CronStatusRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use sg_core::errors::DomainError;
use sg_core::repositories::CronStatusRepository;

use super::db_err;

/// MySQL-backed liveness heartbeat store, upserted by unique job name.
pub struct MySqlCronStatusRepository {
    pool: MySqlPool,
}

impl MySqlCronStatusRepository {
    /// Create a new MySQL cron status repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CronStatusRepository for MySqlCronStatusRepository {
    async fn record_run(&self, name: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO cron_status (name, last_run)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE last_run = VALUES(last_run)
            "#,
        )
        .bind(name)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("record cron heartbeat", e))?;
        Ok(())
    }
}
