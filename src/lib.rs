//! ToDoTrip Compat - personality compatibility service for the ToDoTrip app
//!
//! This library scores how well two travellers' OCEAN personality profiles
//! fit together, turns questionnaire answers into profiles and ranks
//! candidate travel companions by compatibility.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{assess_compatibility, compatibility_score, explain_compatibility, Matcher, FALLBACK_SCORE};
pub use models::{CompatibilityReport, LikertAnswer, PersonalityResult, TraitProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let profile = TraitProfile::uniform(50.0);
        assert_eq!(compatibility_score(Some(&profile), Some(&profile)), 100);
        assert_eq!(compatibility_score(None, Some(&profile)), FALLBACK_SCORE);
    }
}
