// Unit tests for the compatibility scorer and questionnaire

use std::collections::BTreeSet;
use todotrip_compat::core::{
    compatibility::{assess_compatibility, compatibility_score, explain_compatibility, INSUFFICIENT_DATA_MESSAGE},
    personality::{calculate_profile, QUESTIONS},
};
use todotrip_compat::models::{LikertAnswer, TraitProfile};

/// Small deterministic xorshift generator so property checks are repeatable
struct Xorshift(u64);

impl Xorshift {
    fn next_f64(&mut self, max: f64) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % 10_001) as f64 / 10_000.0 * max
    }

    fn profile(&mut self) -> TraitProfile {
        TraitProfile::new(
            self.next_f64(100.0),
            self.next_f64(100.0),
            self.next_f64(100.0),
            self.next_f64(100.0),
            self.next_f64(100.0),
        )
    }
}

#[test]
fn test_score_always_in_range() {
    let mut rng = Xorshift(0x5eed_1234);

    for _ in 0..2_000 {
        let a = rng.profile();
        let b = rng.profile();
        let score = compatibility_score(Some(&a), Some(&b));
        assert!(score <= 100, "score {} out of range for {:?} / {:?}", score, a, b);
    }
}

#[test]
fn test_score_is_symmetric() {
    let mut rng = Xorshift(0xdead_beef);

    for _ in 0..2_000 {
        let a = rng.profile();
        let b = rng.profile();
        assert_eq!(
            compatibility_score(Some(&a), Some(&b)),
            compatibility_score(Some(&b), Some(&a)),
            "asymmetric score for {:?} / {:?}",
            a,
            b
        );
        assert_eq!(
            explain_compatibility(Some(&a), Some(&b)),
            explain_compatibility(Some(&b), Some(&a))
        );
    }
}

#[test]
fn test_identical_balanced_profile_is_maximal() {
    let mut rng = Xorshift(42);

    for _ in 0..500 {
        let mut a = rng.profile();
        a.extraversion = 50.0;
        let b = rng.profile();

        let own = compatibility_score(Some(&a), Some(&a));
        assert_eq!(own, 100);
        assert!(own >= compatibility_score(Some(&a), Some(&b)));
    }
}

#[test]
fn test_midpoint_profiles_score_100() {
    let a = TraitProfile::uniform(50.0);
    let report = assess_compatibility(Some(&a), Some(&a));
    assert_eq!(report.score, 100);
    assert!(report.explanations["overall"].starts_with("High"));
}

#[test]
fn test_opposite_extraversion_is_rewarded() {
    let a = TraitProfile::new(50.0, 50.0, 0.0, 50.0, 50.0);
    let b = TraitProfile::new(50.0, 50.0, 100.0, 50.0, 50.0);

    // similarity 80, complementary 100
    assert_eq!(compatibility_score(Some(&a), Some(&b)), 90);
    assert!(explain_compatibility(Some(&a), Some(&b))["extraversion"].contains("well balanced"));
}

#[test]
fn test_missing_profile_fallback() {
    let any = TraitProfile::new(10.0, 20.0, 30.0, 40.0, 50.0);

    assert_eq!(compatibility_score(None, Some(&any)), 75);
    assert_eq!(compatibility_score(Some(&any), None), 75);

    let explanations = explain_compatibility(None, Some(&any));
    assert_eq!(explanations.len(), 1);
    assert_eq!(explanations.get("overall").map(String::as_str), Some(INSUFFICIENT_DATA_MESSAGE));
}

#[test]
fn test_explanation_key_set() {
    let mut rng = Xorshift(7);
    let expected: BTreeSet<&str> = ["overall", "openness", "conscientiousness", "extraversion"]
        .into_iter()
        .collect();

    for _ in 0..100 {
        let a = rng.profile();
        let b = rng.profile();
        let explanations = explain_compatibility(Some(&a), Some(&b));
        let keys: BTreeSet<&str> = explanations.keys().map(String::as_str).collect();

        assert_eq!(keys, expected);
        assert!(!explanations.contains_key("agreeableness"));
        assert!(!explanations.contains_key("neuroticism"));
    }
}

#[test]
fn test_rounding_half_away_from_zero() {
    let a = TraitProfile::uniform(50.0);

    // similarity 100 - 1/5 = 99.8, complementary (99 + 100 + 100) / 3 = 99.67
    // 0.5 * 99.8 + 0.5 * 99.67 = 99.73 -> 100
    let b = TraitProfile::new(50.0, 50.0, 51.0, 50.0, 50.0);
    assert_eq!(compatibility_score(Some(&a), Some(&b)), 100);

    // similarity 100 - 15/5 = 97, complementary (100 + 100 + 85) / 3 = 95 -> 96
    let c = TraitProfile::new(50.0, 50.0, 50.0, 50.0, 35.0);
    assert_eq!(compatibility_score(Some(&a), Some(&c)), 96);

    // similarity 100 - 3/5 = 99.4, complementary (100 + 100 + 97) / 3 = 99 -> 99.2 -> 99
    let d = TraitProfile::new(50.0, 50.0, 50.0, 50.0, 47.0);
    assert_eq!(compatibility_score(Some(&a), Some(&d)), 99);

    // similarity 98.875, complementary 98.125 -> exactly 98.5 -> 99
    let e = TraitProfile::new(50.0, 50.0, 50.0, 50.0, 44.375);
    assert_eq!(compatibility_score(Some(&a), Some(&e)), 99);
}

#[test]
fn test_sharply_different_openness() {
    let a = TraitProfile::new(90.0, 50.0, 50.0, 50.0, 50.0);
    let b = TraitProfile::new(10.0, 50.0, 50.0, 50.0, 50.0);
    let explanations = explain_compatibility(Some(&a), Some(&b));
    assert!(explanations["openness"].contains("familiar"));
    assert!(explanations["conscientiousness"].contains("similar"));
}

#[test]
fn test_questionnaire_round_trip_into_score() {
    let answers_for = |value: u8| -> Vec<LikertAnswer> {
        QUESTIONS
            .iter()
            .map(|q| LikertAnswer {
                question_id: q.id,
                value: if q.reversed { 6 - value } else { value },
            })
            .collect()
    };

    let social = calculate_profile(&answers_for(5)).unwrap();
    let reserved = calculate_profile(&answers_for(1)).unwrap();

    assert_eq!(social, TraitProfile::uniform(100.0));
    assert_eq!(reserved, TraitProfile::uniform(0.0));

    // Maximally dissimilar everywhere except the extraversion complement
    let score = compatibility_score(Some(&social), Some(&reserved));
    // similarity 0, complementary (100 + 0 + 0) / 3 -> 16.67
    assert_eq!(score, 17);
}
