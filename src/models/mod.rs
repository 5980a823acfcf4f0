// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AuthSession, CandidateTraits, CompatibilityReport, LikertAnswer, MatchingRules,
    PersonalityResult, Question, RankedCompanion, Trait, TraitProfile,
};
pub use requests::{RankCompanionsRequest, RefreshRequest, ScoreProfilesRequest, SignInRequest, SubmitAnswersRequest};
pub use responses::{ErrorResponse, HealthResponse, RankCompanionsResponse, SessionResponse};
