//! MySQL implementation of the OrderRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sg_core::domain::entities::Order;
use sg_core::errors::DomainError;
use sg_core::repositories::OrderRepository;

use super::db_err;

/// MySQL-backed order store.
///
/// Captured bodies live in `order_messages` with a unique
/// `(order_id, body_hash)` key; `INSERT IGNORE` gives the append
/// set-semantics without a read-modify-write cycle.
pub struct MySqlOrderRepository {
    pool: MySqlPool,
}

impl MySqlOrderRepository {
    /// Create a new MySQL order repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// SHA-256 hex digest used as the exact-text dedup key
    fn hash_body(body: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn row_to_order(row: &sqlx::mysql::MySqlRow) -> Result<Order, DomainError> {
        let id: String = row.try_get("id").map_err(|e| db_err("order id", e))?;
        let keywords: String = row
            .try_get("keywords")
            .map_err(|e| db_err("order keywords", e))?;
        let templates: String = row
            .try_get("templates")
            .map_err(|e| db_err("order templates", e))?;
        let country_id: String = row
            .try_get("country_id")
            .map_err(|e| db_err("order country_id", e))?;
        let service_id: String = row
            .try_get("service_id")
            .map_err(|e| db_err("order service_id", e))?;

        Ok(Order {
            id: parse_uuid(&id)?,
            number: row.try_get("number").map_err(|e| db_err("order number", e))?,
            dial_code: row
                .try_get("dial_code")
                .map_err(|e| db_err("order dial_code", e))?,
            country_id: parse_uuid(&country_id)?,
            service_id: parse_uuid(&service_id)?,
            is_used: row.try_get("is_used").map_err(|e| db_err("order is_used", e))?,
            is_multi_use: row
                .try_get("is_multi_use")
                .map_err(|e| db_err("order is_multi_use", e))?,
            next_sms: row
                .try_get("next_sms")
                .map_err(|e| db_err("order next_sms", e))?,
            messages: Vec::new(),
            keywords: parse_string_list(&keywords)?,
            templates: parse_string_list(&templates)?,
            max_messages: row
                .try_get("max_messages")
                .map_err(|e| db_err("order max_messages", e))?,
            active: row.try_get("active").map_err(|e| db_err("order active", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_err("order created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| db_err("order updated_at", e))?,
        })
    }

    /// Load the captured bodies for one order, oldest first
    async fn captured_bodies(&self, id: Uuid) -> Result<Vec<String>, DomainError> {
        let rows = sqlx::query(
            "SELECT body FROM order_messages WHERE order_id = ? ORDER BY captured_at ASC, id ASC",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("load captured bodies", e))?;

        rows.iter()
            .map(|row| row.try_get("body").map_err(|e| db_err("captured body", e)))
            .collect()
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Database {
        message: format!("invalid UUID '{value}': {e}"),
    })
}

/// Keyword/template lists are stored as JSON arrays
fn parse_string_list(value: &str) -> Result<Vec<String>, DomainError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(value).map_err(|e| DomainError::Database {
        message: format!("invalid JSON string list: {e}"),
    })
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn find_active(&self) -> Result<Vec<Order>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, number, dial_code, country_id, service_id,
                   is_used, is_multi_use, next_sms, keywords, templates,
                   max_messages, active, created_at, updated_at
            FROM orders
            WHERE active = 1
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("find active orders", e))?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut order = Self::row_to_order(row)?;
            order.messages = self.captured_bodies(order.id).await?;
            orders.push(order);
        }
        Ok(orders)
    }

    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE orders SET active = 0, updated_at = ? WHERE id = ? AND active = 1")
            .bind(now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("deactivate order", e))?;
        Ok(())
    }

    async fn record_capture(
        &self,
        id: Uuid,
        body: &str,
        first_capture: bool,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_err("begin capture transaction", e))?;

        let inserted = sqlx::query(
            r#"
            INSERT IGNORE INTO order_messages (order_id, body_hash, body, captured_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(Self::hash_body(body))
        .bind(body)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("insert captured body", e))?
        .rows_affected();

        if inserted == 0 {
            // Exact body already captured; nothing else to mutate
            tx.rollback()
                .await
                .map_err(|e| db_err("rollback capture transaction", e))?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE orders
            SET next_sms = 0,
                is_used = IF(?, 1, is_used),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(first_capture)
        .bind(now)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("update order after capture", e))?;

        tx.commit()
            .await
            .map_err(|e| db_err("commit capture transaction", e))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_body_is_stable() {
        let a = MySqlOrderRepository::hash_body("Your OTP is 1234");
        let b = MySqlOrderRepository::hash_body("Your OTP is 1234");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, MySqlOrderRepository::hash_body("Your OTP is 12345"));
    }

    #[test]
    fn test_parse_string_list() {
        assert_eq!(parse_string_list("").unwrap(), Vec::<String>::new());
        assert_eq!(
            parse_string_list(r#"["otp", "code"]"#).unwrap(),
            vec!["otp".to_string(), "code".to_string()]
        );
        assert!(parse_string_list("not json").is_err());
    }
}
