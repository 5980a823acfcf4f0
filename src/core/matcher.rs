use std::collections::HashSet;

use crate::core::compatibility::{compatibility_score, explain_compatibility};
use crate::models::{CandidateTraits, MatchingRules, RankedCompanion, TraitProfile};

/// Result of ranking candidate companions
///
/// `total_candidates` is the number of ids submitted, including the
/// requesting user and repeats that stage 1 drops.
#[derive(Debug)]
pub struct RankResult {
    pub companions: Vec<RankedCompanion>,
    pub total_candidates: usize,
}

/// Orders candidate travel companions by personality compatibility
///
/// # Pipeline Stages
/// 1. Drop the requesting user and repeated candidate ids
/// 2. Score every remaining candidate
/// 3. Apply the minimum score
/// 4. Sort and truncate
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: MatchingRules,
}

impl Matcher {
    pub fn new(rules: MatchingRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: MatchingRules::default(),
        }
    }

    pub fn rules(&self) -> MatchingRules {
        self.rules
    }

    /// Rank candidates for `user_id`
    ///
    /// Candidates without a stored profile still get the fallback score, but
    /// sort after scored candidates with the same value.
    pub fn rank(
        &self,
        user_id: &str,
        own_profile: Option<&TraitProfile>,
        candidates: Vec<CandidateTraits>,
        limit: usize,
    ) -> RankResult {
        let total_candidates = candidates.len();
        let limit = limit.min(self.rules.max_limit);
        let mut seen = HashSet::with_capacity(candidates.len());

        let mut companions: Vec<RankedCompanion> = candidates
            .into_iter()
            // Stage 1: self and duplicates
            .filter(|c| c.user_id != user_id && seen.insert(c.user_id.clone()))
            // Stage 2 & 3: score and threshold
            .filter_map(|c| {
                let score = compatibility_score(own_profile, c.profile.as_ref());

                if score < self.rules.min_score {
                    return None;
                }

                Some(RankedCompanion {
                    explanations: explain_compatibility(own_profile, c.profile.as_ref()),
                    has_profile: c.profile.is_some(),
                    user_id: c.user_id,
                    compatibility_score: score,
                })
            })
            .collect();

        // Score (descending), real profiles before fallback ties, then id
        companions.sort_by(|a, b| {
            b.compatibility_score
                .cmp(&a.compatibility_score)
                .then_with(|| b.has_profile.cmp(&a.has_profile))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        companions.truncate(limit);

        tracing::debug!(
            "Ranked {} of {} candidates for {}",
            companions.len(),
            total_candidates,
            user_id
        );

        RankResult {
            companions,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
