//! MySQL implementation of the MessageRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sg_core::domain::entities::Message;
use sg_core::errors::DomainError;
use sg_core::repositories::{CandidateQuery, MessageRepository};

use super::db_err;

/// Read-only MySQL view over the ingested message store.
pub struct MySqlMessageRepository {
    pool: MySqlPool,
}

impl MySqlMessageRepository {
    /// Create a new MySQL message repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_message(row: &sqlx::mysql::MySqlRow) -> Result<Message, DomainError> {
        let id: String = row.try_get("id").map_err(|e| db_err("message id", e))?;
        Ok(Message {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("invalid message UUID '{id}': {e}"),
            })?,
            sender: row.try_get("sender").map_err(|e| db_err("message sender", e))?,
            receiver: row
                .try_get("receiver")
                .map_err(|e| db_err("message receiver", e))?,
            port: row.try_get("port").map_err(|e| db_err("message port", e))?,
            received_at: row
                .try_get::<DateTime<Utc>, _>("received_at")
                .map_err(|e| db_err("message received_at", e))?,
            body: row.try_get("body").map_err(|e| db_err("message body", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_err("message created_at", e))?,
        })
    }

    /// `%`-wrapped LIKE pattern with the wildcard characters escaped
    fn like_pattern(needle: &str) -> String {
        let escaped = needle
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped.to_lowercase())
    }
}

#[async_trait]
impl MessageRepository for MySqlMessageRepository {
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Message>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender, receiver, port, received_at, body, created_at
            FROM messages
            WHERE received_at > ?
              AND (receiver = ?
                   OR receiver = ?
                   OR LOWER(body) LIKE ?
                   OR LOWER(body) LIKE ?)
            ORDER BY received_at ASC
            "#,
        )
        .bind(query.since)
        .bind(&query.full_number)
        .bind(&query.bare_number)
        .bind(Self::like_pattern(&query.full_number))
        .bind(Self::like_pattern(&query.bare_number))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("find candidate messages", e))?;

        rows.iter().map(Self::row_to_message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(
            MySqlMessageRepository::like_pattern("+919876543210"),
            "%+919876543210%"
        );
        assert_eq!(MySqlMessageRepository::like_pattern("a%b_c"), "%a\\%b\\_c%");
    }
}
