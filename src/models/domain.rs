use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// OCEAN personality dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trait::Openness => "openness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Extraversion => "extraversion",
            Trait::Agreeableness => "agreeableness",
            Trait::Neuroticism => "neuroticism",
        }
    }
}

impl std::fmt::Display for Trait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five-dimensional personality vector, each dimension on a 0-100 scale
///
/// Values are not range-checked here; the questionnaire only ever produces
/// values inside [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitProfile {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl TraitProfile {
    pub fn new(
        openness: f64,
        conscientiousness: f64,
        extraversion: f64,
        agreeableness: f64,
        neuroticism: f64,
    ) -> Self {
        Self {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        }
    }

    /// Profile with every dimension set to the same value
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value, value)
    }

    pub fn get(&self, t: Trait) -> f64 {
        match t {
            Trait::Openness => self.openness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Extraversion => self.extraversion,
            Trait::Agreeableness => self.agreeableness,
            Trait::Neuroticism => self.neuroticism,
        }
    }
}

/// Completed personality test for a user, one row per user in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityResult {
    #[serde(rename = "testId")]
    pub test_id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(flatten)]
    pub profile: TraitProfile,
    #[serde(rename = "completedAt")]
    pub completed_at: DateTime<Utc>,
}

/// A questionnaire statement answered on a 1-5 agreement scale
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub id: u16,
    #[serde(rename = "trait")]
    pub dimension: Trait,
    pub text: &'static str,
    /// Agreement lowers the trait score instead of raising it
    pub reversed: bool,
}

/// A single Likert answer (1 = strongly disagree, 5 = strongly agree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertAnswer {
    #[serde(rename = "questionId")]
    pub question_id: u16,
    pub value: u8,
}

/// Compatibility score with per-trait explanations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub score: u8,
    pub explanations: BTreeMap<String, String>,
}

/// Candidate companion with whatever profile the store had for them
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTraits {
    pub user_id: String,
    pub profile: Option<TraitProfile>,
}

/// Ranked companion returned by the matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCompanion {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
    #[serde(rename = "hasProfile")]
    pub has_profile: bool,
    pub explanations: BTreeMap<String, String>,
}

/// Session issued by the hosted auth provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

/// Matcher tuning
#[derive(Debug, Clone, Copy)]
pub struct MatchingRules {
    pub min_score: u8,
    pub max_limit: usize,
}

impl Default for MatchingRules {
    fn default() -> Self {
        Self {
            min_score: 0,
            max_limit: 100,
        }
    }
}
