use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{PersonalityResult, TraitProfile};
use crate::services::store::{ProfileStore, StoreError};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL-backed store for personality results
///
/// Used when the service owns its own database instead of going through the
/// hosted backend's REST layer. Same table shape as the hosted store.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Get the personality result for a user
    pub async fn get_result(&self, user_id: &str) -> Result<Option<PersonalityResult>, PostgresError> {
        let query = r#"
            SELECT test_id, user_id, openness, conscientiousness, extraversion,
                   agreeableness, neuroticism, completed_at
            FROM personality_results
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| PersonalityResult {
            test_id: row.get("test_id"),
            user_id: row.get("user_id"),
            profile: TraitProfile::new(
                row.get("openness"),
                row.get("conscientiousness"),
                row.get("extraversion"),
                row.get("agreeableness"),
                row.get("neuroticism"),
            ),
            completed_at: row.get("completed_at"),
        }))
    }

    /// Insert or replace a user's personality result
    ///
    /// Uses INSERT ... ON CONFLICT so a retest overwrites the whole row.
    pub async fn upsert_result(&self, result: &PersonalityResult) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO personality_results (
                user_id, test_id, openness, conscientiousness, extraversion,
                agreeableness, neuroticism, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id)
            DO UPDATE SET
                test_id = EXCLUDED.test_id,
                openness = EXCLUDED.openness,
                conscientiousness = EXCLUDED.conscientiousness,
                extraversion = EXCLUDED.extraversion,
                agreeableness = EXCLUDED.agreeableness,
                neuroticism = EXCLUDED.neuroticism,
                completed_at = EXCLUDED.completed_at
        "#;

        sqlx::query(query)
            .bind(&result.user_id)
            .bind(result.test_id)
            .bind(result.profile.openness)
            .bind(result.profile.conscientiousness)
            .bind(result.profile.extraversion)
            .bind(result.profile.agreeableness)
            .bind(result.profile.neuroticism)
            .bind(result.completed_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Stored personality result {} for user {}",
            result.test_id,
            result.user_id
        );

        Ok(())
    }

    /// Remove a user's personality result
    pub async fn delete_result(&self, user_id: &str) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM personality_results
            WHERE user_id = $1
        "#;

        let result = sqlx::query(query).bind(user_id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    pub async fn ping(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn fetch(&self, user_id: &str) -> Result<Option<PersonalityResult>, StoreError> {
        Ok(self.get_result(user_id).await?)
    }

    async fn upsert(&self, result: &PersonalityResult) -> Result<(), StoreError> {
        Ok(self.upsert_result(result).await?)
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.delete_result(user_id).await?)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(self.ping().await?)
    }
}
