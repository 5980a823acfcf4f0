use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::PersonalityResult;
use crate::services::hosted::HostedError;
use crate::services::postgres::PostgresError;

/// Errors surfaced by any profile store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Hosted backend error: {0}")]
    Hosted(#[from] HostedError),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] PostgresError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for personality results, one row per user
///
/// `upsert` replaces the whole row; there are no partial updates.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the stored result for a user, `None` if no test was taken
    async fn fetch(&self, user_id: &str) -> Result<Option<PersonalityResult>, StoreError>;

    /// Insert or wholesale replace a user's result
    async fn upsert(&self, result: &PersonalityResult) -> Result<(), StoreError>;

    /// Remove a user's result, returning whether a row existed
    async fn delete(&self, user_id: &str) -> Result<bool, StoreError>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Process-local store for development and tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: RwLock<HashMap<String, PersonalityResult>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn fetch(&self, user_id: &str) -> Result<Option<PersonalityResult>, StoreError> {
        Ok(self.rows.read().await.get(user_id).cloned())
    }

    async fn upsert(&self, result: &PersonalityResult) -> Result<(), StoreError> {
        self.rows
            .write()
            .await
            .insert(result.user_id.clone(), result.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.rows.write().await.remove(user_id).is_some())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
