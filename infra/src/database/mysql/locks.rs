//! MySQL implementation of the LockRepository trait.

use async_trait::async_trait;
use sqlx::MySqlPool;

use sg_core::domain::entities::Lock;
use sg_core::errors::DomainError;
use sg_core::repositories::LockRepository;

use super::db_err;

/// MySQL-backed advisory lock store.
pub struct MySqlLockRepository {
    pool: MySqlPool,
}

impl MySqlLockRepository {
    /// Create a new MySQL lock repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LockRepository for MySqlLockRepository {
    async fn create(&self, lock: Lock) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO locks (id, number, country_id, service_id, locked, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(lock.id.to_string())
        .bind(&lock.number)
        .bind(lock.country_id.to_string())
        .bind(lock.service_id.to_string())
        .bind(lock.locked)
        .bind(lock.created_at)
        .bind(lock.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("create lock", e))?;
        Ok(())
    }
}
