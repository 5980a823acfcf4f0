use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{LikertAnswer, TraitProfile};

/// Submit questionnaire answers for the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[validate(length(min = 1))]
    pub answers: Vec<LikertAnswer>,
}

/// Score two profiles supplied by the caller; either may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreProfilesRequest {
    #[serde(default)]
    pub a: Option<TraitProfile>,
    #[serde(default)]
    pub b: Option<TraitProfile>,
}

/// Rank candidate companions for the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankCompanionsRequest {
    #[validate(length(min = 1, max = 500))]
    #[serde(alias = "candidate_ids", rename = "candidateIds")]
    pub candidate_ids: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

/// Email/password sign-in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Exchange a refresh token for a new session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "refresh_token", rename = "refreshToken")]
    pub refresh_token: String,
}
