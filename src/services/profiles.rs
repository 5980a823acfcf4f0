use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::core::compatibility::assess_compatibility;
use crate::core::personality::{calculate_profile, PersonalityError};
use crate::models::{CandidateTraits, CompatibilityReport, LikertAnswer, PersonalityResult, TraitProfile};
use crate::services::cache::{CacheKey, TtlCache};
use crate::services::store::{ProfileStore, StoreError};

/// Errors that can occur in the profile service
#[derive(Debug, Error)]
pub enum ProfileServiceError {
    #[error("Invalid answers: {0}")]
    InvalidAnswers(#[from] PersonalityError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetches, caches and persists personality results
///
/// Absent results are cached too, so a user without a test does not hit the
/// store on every lookup until the TTL runs out or they submit answers.
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    cache: TtlCache<Option<PersonalityResult>>,
    retries: u32,
    retry_delay: Duration,
}

impl ProfileService {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        cache: TtlCache<Option<PersonalityResult>>,
        retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            retries,
            retry_delay,
        }
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    pub fn cache(&self) -> &TtlCache<Option<PersonalityResult>> {
        &self.cache
    }

    /// Get a user's stored result, cache first
    pub async fn result(&self, user_id: &str) -> Result<Option<PersonalityResult>, StoreError> {
        let key = CacheKey::personality(user_id);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let fetched = self.fetch_with_retry(user_id).await?;

        // A submit that finished while we were fetching wins over our read
        Ok(self.cache.insert_if_absent(key, fetched))
    }

    /// Get only the trait profile for a user
    pub async fn profile(&self, user_id: &str) -> Result<Option<TraitProfile>, StoreError> {
        Ok(self.result(user_id).await?.map(|r| r.profile))
    }

    async fn fetch_with_retry(&self, user_id: &str) -> Result<Option<PersonalityResult>, StoreError> {
        let mut attempt = 0;

        loop {
            match self.store.fetch(user_id).await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Fetching personality result for {} failed (attempt {}): {}",
                        user_id,
                        attempt,
                        e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Score a questionnaire and store it as the user's current result
    ///
    /// Every submission is a new test session and replaces the previous row.
    pub async fn submit(
        &self,
        user_id: &str,
        answers: &[LikertAnswer],
    ) -> Result<PersonalityResult, ProfileServiceError> {
        let profile = calculate_profile(answers)?;

        let result = PersonalityResult {
            test_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            profile,
            completed_at: Utc::now(),
        };

        let key = CacheKey::personality(user_id);
        if let Err(e) = self.store.upsert(&result).await {
            self.cache.invalidate(&key);
            return Err(e.into());
        }

        self.cache.insert(key, Some(result.clone()));

        tracing::info!("Stored personality test {} for user {}", result.test_id, user_id);

        Ok(result)
    }

    /// Delete a user's result and forget the cached copy
    pub async fn remove(&self, user_id: &str) -> Result<bool, StoreError> {
        let removed = self.store.delete(user_id).await?;
        self.cache.invalidate(&CacheKey::personality(user_id));
        Ok(removed)
    }

    /// Compatibility between two stored users
    pub async fn compatibility(&self, user_id: &str, other_user_id: &str) -> Result<CompatibilityReport, StoreError> {
        let own = self.profile(user_id).await?;
        let other = self.profile(other_user_id).await?;

        Ok(assess_compatibility(own.as_ref(), other.as_ref()))
    }

    /// Load candidate profiles, treating failed lookups as "no profile"
    pub async fn candidates(&self, user_ids: &[String]) -> Vec<CandidateTraits> {
        let mut candidates = Vec::with_capacity(user_ids.len());

        for user_id in user_ids {
            let profile = match self.profile(user_id).await {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!("Failed to load profile for candidate {}, using fallback: {}", user_id, e);
                    None
                }
            };

            candidates.push(CandidateTraits {
                user_id: user_id.clone(),
                profile,
            });
        }

        candidates
    }
}
