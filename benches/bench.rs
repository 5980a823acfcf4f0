// Criterion benchmarks for ToDoTrip Compat

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use todotrip_compat::core::{
    compatibility::{compatibility_score, explain_compatibility},
    personality::{calculate_profile, QUESTIONS},
    Matcher,
};
use todotrip_compat::models::{CandidateTraits, LikertAnswer, TraitProfile};

fn create_profile(seed: usize) -> TraitProfile {
    let trait_value = |offset: usize| ((seed * 37 + offset * 11) % 101) as f64;

    TraitProfile::new(
        trait_value(0),
        trait_value(1),
        trait_value(2),
        trait_value(3),
        trait_value(4),
    )
}

fn create_candidate(id: usize) -> CandidateTraits {
    CandidateTraits {
        user_id: format!("traveller-{}", id),
        // Every seventh candidate has not taken the questionnaire
        profile: if id % 7 == 0 { None } else { Some(create_profile(id)) },
    }
}

fn bench_compatibility_score(c: &mut Criterion) {
    let a = create_profile(3);
    let b = create_profile(11);

    c.bench_function("compatibility_score", |bench| {
        bench.iter(|| compatibility_score(black_box(Some(&a)), black_box(Some(&b))));
    });
}

fn bench_explanations(c: &mut Criterion) {
    let a = create_profile(5);
    let b = create_profile(8);

    c.bench_function("explain_compatibility", |bench| {
        bench.iter(|| explain_compatibility(black_box(Some(&a)), black_box(Some(&b))));
    });
}

fn bench_questionnaire(c: &mut Criterion) {
    let answers: Vec<LikertAnswer> = QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| LikertAnswer {
            question_id: q.id,
            value: (i % 5) as u8 + 1,
        })
        .collect();

    c.bench_function("calculate_profile", |bench| {
        bench.iter(|| calculate_profile(black_box(&answers)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_rules();
    let own = create_profile(1);

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 50, 100, 500].iter() {
        let candidates: Vec<CandidateTraits> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank", candidate_count),
            candidate_count,
            |bench, _| {
                bench.iter(|| {
                    matcher.rank(
                        black_box("traveller-self"),
                        black_box(Some(&own)),
                        black_box(candidates.clone()),
                        black_box(20),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compatibility_score,
    bench_explanations,
    bench_questionnaire,
    bench_ranking
);

criterion_main!(benches);
