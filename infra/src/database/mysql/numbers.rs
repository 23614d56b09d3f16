//! MySQL implementation of the NumberRepository trait.

use async_trait::async_trait;
use sqlx::{MySqlPool, QueryBuilder};
use uuid::Uuid;

use sg_core::domain::entities::PortTelemetry;
use sg_core::errors::DomainError;
use sg_core::repositories::{NumberRepository, UpsertOutcome};

use super::db_err;

/// MySQL-backed number inventory, keyed by the unique phone number.
pub struct MySqlNumberRepository {
    pool: MySqlPool,
}

impl MySqlNumberRepository {
    /// Create a new MySQL number repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NumberRepository for MySqlNumberRepository {
    async fn upsert_telemetry(
        &self,
        telemetry: &PortTelemetry,
    ) -> Result<UpsertOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO numbers
                (id, number, country_id, port, iccid, imsi, operator,
                 signal_strength, locked, last_rotation, active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                country_id = VALUES(country_id),
                port = VALUES(port),
                iccid = VALUES(iccid),
                imsi = VALUES(imsi),
                operator = VALUES(operator),
                signal_strength = VALUES(signal_strength),
                locked = VALUES(locked),
                last_rotation = VALUES(last_rotation),
                active = VALUES(active)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&telemetry.number)
        .bind(telemetry.country_id.to_string())
        .bind(&telemetry.port)
        .bind(&telemetry.iccid)
        .bind(&telemetry.imsi)
        .bind(&telemetry.operator)
        .bind(telemetry.signal)
        .bind(telemetry.locked)
        .bind(telemetry.last_rotation)
        .bind(telemetry.active)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("upsert number telemetry", e))?;

        // MySQL reports 1 affected row for an insert, 2 for an update
        if result.rows_affected() == 1 {
            Ok(UpsertOutcome::Inserted)
        } else {
            Ok(UpsertOutcome::Updated)
        }
    }

    async fn deactivate_missing(&self, seen: &[String]) -> Result<u64, DomainError> {
        let mut builder = QueryBuilder::new(
            "UPDATE numbers SET active = 0, signal_strength = 0 \
             WHERE (active = 1 OR signal_strength <> 0)",
        );
        if !seen.is_empty() {
            builder.push(" AND number NOT IN (");
            let mut numbers = builder.separated(", ");
            for number in seen {
                numbers.push_bind(number);
            }
            builder.push(")");
        }

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("deactivate missing numbers", e))?;
        Ok(result.rows_affected())
    }
}
