//! MySQL implementation of the CountryRepository trait.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sg_core::domain::entities::Country;
use sg_core::errors::DomainError;
use sg_core::repositories::CountryRepository;

use super::db_err;

/// MySQL-backed country reference store.
pub struct MySqlCountryRepository {
    pool: MySqlPool,
}

impl MySqlCountryRepository {
    /// Create a new MySQL country repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, DomainError> {
        let row = sqlx::query("SELECT id, name FROM countries WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("find country", e))?;

        row.map(|row| {
            let id: String = row.try_get("id").map_err(|e| db_err("country id", e))?;
            Ok(Country {
                id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                    message: format!("invalid country UUID '{id}': {e}"),
                })?,
                name: row.try_get("name").map_err(|e| db_err("country name", e))?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl CountryRepository for MySqlCountryRepository {
    async fn get_or_create(&self, name: &str) -> Result<Country, DomainError> {
        let name = name.to_lowercase();
        if let Some(country) = self.find_by_name(&name).await? {
            return Ok(country);
        }

        // INSERT IGNORE keeps this race-safe against a concurrent creator;
        // the unique name key makes whoever wins authoritative.
        sqlx::query("INSERT IGNORE INTO countries (id, name) VALUES (?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(&name)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("create country", e))?;

        self.find_by_name(&name)
            .await?
            .ok_or_else(|| DomainError::Internal {
                message: format!("country '{name}' missing after insert"),
            })
    }
}
