use serde::{Deserialize, Serialize};
use crate::models::domain::{AuthSession, RankedCompanion};

/// Response for the companion ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankCompanionsResponse {
    pub companions: Vec<RankedCompanion>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}

/// Auth state snapshot returned after a sign-in or refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub state: String,
    pub session: Option<AuthSession>,
}
