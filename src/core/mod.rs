// Core algorithm exports
pub mod compatibility;
pub mod matcher;
pub mod personality;

pub use compatibility::{assess_compatibility, compatibility_score, explain_compatibility, FALLBACK_SCORE};
pub use matcher::{Matcher, RankResult};
pub use personality::{calculate_profile, PersonalityError, QUESTIONS};
