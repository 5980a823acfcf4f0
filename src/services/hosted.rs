use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{PersonalityResult, TraitProfile};
use crate::services::store::{ProfileStore, StoreError};

/// Errors that can occur when interacting with the hosted backend
#[derive(Debug, Error)]
pub enum HostedError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Row layout of the personality results table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityRow {
    pub test_id: Uuid,
    pub user_id: String,
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
    pub completed_at: DateTime<Utc>,
}

impl From<&PersonalityResult> for PersonalityRow {
    fn from(result: &PersonalityResult) -> Self {
        Self {
            test_id: result.test_id,
            user_id: result.user_id.clone(),
            openness: result.profile.openness,
            conscientiousness: result.profile.conscientiousness,
            extraversion: result.profile.extraversion,
            agreeableness: result.profile.agreeableness,
            neuroticism: result.profile.neuroticism,
            completed_at: result.completed_at,
        }
    }
}

impl From<PersonalityRow> for PersonalityResult {
    fn from(row: PersonalityRow) -> Self {
        Self {
            test_id: row.test_id,
            user_id: row.user_id,
            profile: TraitProfile::new(
                row.openness,
                row.conscientiousness,
                row.extraversion,
                row.agreeableness,
                row.neuroticism,
            ),
            completed_at: row.completed_at,
        }
    }
}

/// REST client for the hosted backend's relational store
///
/// Talks to a PostgREST-style table endpoint:
/// - `GET    /rest/v1/{table}?user_id=eq.{id}` to read a user's row
/// - `POST   /rest/v1/{table}?on_conflict=user_id` to upsert
/// - `DELETE /rest/v1/{table}?user_id=eq.{id}` to remove
pub struct HostedStore {
    base_url: String,
    api_key: String,
    table: String,
    client: Client,
}

impl HostedStore {
    /// Create a new hosted store client
    pub fn new(
        base_url: String,
        api_key: String,
        table: String,
        timeout: Duration,
    ) -> Result<Self, HostedError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            table,
            client,
        })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check_status(response: Response, action: &str) -> Result<Response, HostedError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(HostedError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Failed to {}: {} - {}", action, status, body);

        Err(HostedError::ApiError(format!("Failed to {}: {}", action, status)))
    }

    /// Fetch the personality result for a user
    pub async fn get_result(&self, user_id: &str) -> Result<Option<PersonalityResult>, HostedError> {
        let url = format!(
            "{}?user_id=eq.{}&select=*",
            self.table_url(),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching personality result for user: {}", user_id);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check_status(response, "fetch personality result").await?;

        let rows: Vec<PersonalityRow> = response
            .json()
            .await
            .map_err(|e| HostedError::InvalidResponse(format!("Failed to parse rows: {}", e)))?;

        Ok(rows.into_iter().next().map(PersonalityResult::from))
    }

    /// Insert or replace the personality result for a user
    pub async fn upsert_result(&self, result: &PersonalityResult) -> Result<(), HostedError> {
        let url = format!("{}?on_conflict=user_id", self.table_url());
        let payload = vec![PersonalityRow::from(result)];

        let response = self
            .authorize(self.client.post(&url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&payload)
            .send()
            .await?;
        Self::check_status(response, "upsert personality result").await?;

        tracing::debug!(
            "Upserted personality result {} for user {}",
            result.test_id,
            result.user_id
        );

        Ok(())
    }

    /// Delete the personality result for a user
    pub async fn delete_result(&self, user_id: &str) -> Result<bool, HostedError> {
        let url = format!(
            "{}?user_id=eq.{}",
            self.table_url(),
            urlencoding::encode(user_id)
        );

        let response = self
            .authorize(self.client.delete(&url))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let response = Self::check_status(response, "delete personality result").await?;

        let deleted: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| HostedError::InvalidResponse(format!("Failed to parse rows: {}", e)))?;

        Ok(!deleted.is_empty())
    }

    /// Cheap reachability probe against the results table
    pub async fn ping(&self) -> Result<bool, HostedError> {
        let url = format!("{}?select=user_id&limit=1", self.table_url());
        let response = self.authorize(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl ProfileStore for HostedStore {
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
