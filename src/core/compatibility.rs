use std::collections::BTreeMap;

use crate::models::{CompatibilityReport, Trait, TraitProfile};

/// Score reported when either side has not taken the personality test
pub const FALLBACK_SCORE: u8 = 75;

pub const OVERALL_KEY: &str = "overall";

pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "Not enough personality data yet. Complete the personality test to see how well you match.";

/// Raw per-pair numbers shared by the score and the explanations
#[derive(Debug, Clone, Copy)]
struct Components {
    openness_diff: f64,
    conscientiousness_diff: f64,
    extraversion_sum: f64,
    extraversion_complement: f64,
    similarity: f64,
    complementary: f64,
}

impl Components {
    fn between(a: &TraitProfile, b: &TraitProfile) -> Self {
        let diff = |t: Trait| (a.get(t) - b.get(t)).abs();

        let total_diff: f64 = Trait::ALL.iter().map(|&t| diff(t)).sum();
        let similarity = 100.0 - total_diff / Trait::ALL.len() as f64;

        // Extraversion pairs best when one side makes up for the other
        let extraversion_sum = a.extraversion + b.extraversion;
        let extraversion_complement = 100.0 - (extraversion_sum - 100.0).abs();

        let complementary = (extraversion_complement
            + (100.0 - diff(Trait::Agreeableness))
            + (100.0 - diff(Trait::Neuroticism)))
            / 3.0;

        Self {
            openness_diff: diff(Trait::Openness),
            conscientiousness_diff: diff(Trait::Conscientiousness),
            extraversion_sum,
            extraversion_complement,
            similarity,
            complementary,
        }
    }

    /// Rounded half away from zero, then clamped
    fn overall(&self) -> u8 {
        let weighted = 0.5 * self.similarity + 0.5 * self.complementary;
        weighted.round().clamp(0.0, 100.0) as u8
    }
}

/// Calculate an overall compatibility percentage (0-100) for two profiles
///
/// Score formula:
/// similarity    = 100 - mean(|a_t - b_t|) over all five traits
/// complementary = mean(
///     100 - |a.extraversion + b.extraversion - 100|,
///     100 - |a.agreeableness - b.agreeableness|,
///     100 - |a.neuroticism - b.neuroticism|,
/// )
/// overall       = round(0.5 * similarity + 0.5 * complementary)
///
/// Returns [`FALLBACK_SCORE`] when either profile is missing.
pub fn compatibility_score(a: Option<&TraitProfile>, b: Option<&TraitProfile>) -> u8 {
    match (a, b) {
        (Some(a), Some(b)) => Components::between(a, b).overall(),
        _ => FALLBACK_SCORE,
    }
}

/// Human-readable explanations keyed by trait name plus `overall`
///
/// Only openness, conscientiousness and extraversion get their own entry;
/// agreeableness and neuroticism feed the score but are not explained.
pub fn explain_compatibility(
    a: Option<&TraitProfile>,
    b: Option<&TraitProfile>,
) -> BTreeMap<String, String> {
    let mut explanations = BTreeMap::new();

    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            explanations.insert(OVERALL_KEY.to_string(), INSUFFICIENT_DATA_MESSAGE.to_string());
            return explanations;
        }
    };

    let components = Components::between(a, b);

    explanations.insert(
        OVERALL_KEY.to_string(),
        overall_message(components.overall()).to_string(),
    );
    explanations.insert(
        Trait::Openness.to_string(),
        openness_message(components.openness_diff, a.openness, b.openness).to_string(),
    );
    explanations.insert(
        Trait::Conscientiousness.to_string(),
        conscientiousness_message(
            components.conscientiousness_diff,
            a.conscientiousness,
            b.conscientiousness,
        )
        .to_string(),
    );
    explanations.insert(
        Trait::Extraversion.to_string(),
        extraversion_message(components.extraversion_complement, components.extraversion_sum)
            .to_string(),
    );

    explanations
}

/// Score and explanations in one pass
pub fn assess_compatibility(a: Option<&TraitProfile>, b: Option<&TraitProfile>) -> CompatibilityReport {
    CompatibilityReport {
        score: compatibility_score(a, b),
        explanations: explain_compatibility(a, b),
    }
}

#[inline]
fn sharply_different(a: f64, b: f64) -> bool {
    (a > 70.0 && b < 30.0) || (a < 30.0 && b > 70.0)
}

fn openness_message(diff: f64, a: f64, b: f64) -> &'static str {
    if diff < 20.0 {
        "You share a similar appetite for new places and experiences."
    } else if sharply_different(a, b) {
        "One of you chases the unknown while the other loves the familiar. Plan a mix of both."
    } else {
        "You differ a little in how adventurous you like a trip to be."
    }
}

fn conscientiousness_message(diff: f64, a: f64, b: f64) -> &'static str {
    if diff < 20.0 {
        "You approach planning and organisation in a similar way."
    } else if sharply_different(a, b) {
        "One of you plans every detail while the other goes with the flow. Agree on the essentials early."
    } else {
        "Your planning styles differ somewhat but should be easy to align."
    }
}

fn extraversion_message(complement: f64, sum: f64) -> &'static str {
    if complement > 80.0 {
        "Your social energy is well balanced: one brings the buzz, the other the calm."
    } else if sum > 140.0 {
        "You are both highly social, so expect busy days and plenty of new friends."
    } else if sum < 60.0 {
        "You are both on the reserved side and will likely enjoy quiet, low-key travel."
    } else {
        "Your social energy is moderately balanced."
    }
}

fn overall_message(score: u8) -> &'static str {
    if score >= 80 {
        "High compatibility! Your personalities fit together really well for travelling."
    } else if score >= 60 {
        "Good compatibility. You have a solid base for a great trip together."
    } else {
        "Moderate compatibility. Your differences could make the trip interesting with a bit of compromise."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(o: f64, c: f64, e: f64, a: f64, n: f64) -> TraitProfile {
        TraitProfile::new(o, c, e, a, n)
    }

    #[test]
    fn test_identical_midpoint_profiles_score_100() {
        let a = TraitProfile::uniform(50.0);
        assert_eq!(compatibility_score(Some(&a), Some(&a)), 100);
    }

    #[test]
    fn test_missing_profile_falls_back() {
        let a = TraitProfile::uniform(50.0);
        assert_eq!(compatibility_score(None, Some(&a)), FALLBACK_SCORE);
        assert_eq!(compatibility_score(Some(&a), None), 75);
        assert_eq!(compatibility_score(None, None), 75);

        let explanations = explain_compatibility(Some(&a), None);
        assert_eq!(explanations.len(), 1);
        assert_eq!(explanations[OVERALL_KEY], INSUFFICIENT_DATA_MESSAGE);
    }

    #[test]
    fn test_complementary_extraversion() {
        let a = profile(50.0, 50.0, 0.0, 50.0, 50.0);
        let b = profile(50.0, 50.0, 100.0, 50.0, 50.0);

        let components = Components::between(&a, &b);
        assert_eq!(components.similarity, 80.0);
        assert_eq!(components.extraversion_complement, 100.0);
        assert_eq!(components.complementary, 100.0);
        assert_eq!(compatibility_score(Some(&a), Some(&b)), 90);
    }

    #[test]
    fn test_two_extraverts_lose_complement() {
        let a = TraitProfile::uniform(100.0);
        let components = Components::between(&a, &a);
        assert_eq!(components.similarity, 100.0);
        assert_eq!(components.extraversion_complement, 0.0);
        // (0 + 100 + 100) / 3
        assert!((components.complementary - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(compatibility_score(Some(&a), Some(&a)), 83);
    }

    #[test]
    fn test_score_is_clamped() {
        let a = profile(500.0, 500.0, 500.0, 500.0, 500.0);
        let b = profile(-500.0, -500.0, -500.0, -500.0, -500.0);
        assert_eq!(compatibility_score(Some(&a), Some(&b)), 0);
    }

    #[test]
    fn test_openness_bands() {
        assert!(openness_message(10.0, 50.0, 60.0).contains("similar"));
        assert!(openness_message(60.0, 80.0, 20.0).contains("familiar"));
        assert!(openness_message(60.0, 20.0, 80.0).contains("familiar"));
        assert!(openness_message(30.0, 40.0, 70.0).contains("differ a little"));
    }

    #[test]
    fn test_extraversion_bands() {
        assert!(extraversion_message(90.0, 110.0).contains("well balanced"));
        assert!(extraversion_message(50.0, 150.0).contains("highly social"));
        assert!(extraversion_message(50.0, 50.0).contains("reserved"));
        assert!(extraversion_message(70.0, 70.0).contains("moderately"));
    }

    #[test]
    fn test_overall_bands() {
        assert!(overall_message(80).starts_with("High"));
        assert!(overall_message(79).starts_with("Good"));
        assert!(overall_message(60).starts_with("Good"));
        assert!(overall_message(59).starts_with("Moderate"));
    }

    #[test]
    fn test_assess_matches_parts() {
        let a = profile(80.0, 20.0, 30.0, 60.0, 40.0);
        let b = profile(20.0, 75.0, 65.0, 55.0, 45.0);
        let report = assess_compatibility(Some(&a), Some(&b));
        assert_eq!(report.score, compatibility_score(Some(&a), Some(&b)));
        assert_eq!(report.explanations, explain_compatibility(Some(&a), Some(&b)));
    }
}
