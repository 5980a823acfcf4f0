use std::collections::HashSet;

use thiserror::Error;

use crate::models::{LikertAnswer, Question, Trait, TraitProfile};

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// Errors that can occur while scoring a questionnaire
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersonalityError {
    #[error("Unknown question id: {0}")]
    UnknownQuestion(u16),

    #[error("Question {0} answered more than once")]
    DuplicateAnswer(u16),

    #[error("Answer {value} for question {question_id} is outside 1-5")]
    AnswerOutOfRange { question_id: u16, value: u8 },

    #[error("Questionnaire incomplete: {missing} of {total} questions unanswered")]
    Incomplete { missing: usize, total: usize },
}

const fn question(id: u16, dimension: Trait, text: &'static str, reversed: bool) -> Question {
    Question {
        id,
        dimension,
        text,
        reversed,
    }
}

/// The fixed travel-personality questionnaire, three statements per trait
pub const QUESTIONS: [Question; 15] = [
    question(1, Trait::Openness, "I love exploring places I have never heard of before.", false),
    question(2, Trait::Openness, "Trying unfamiliar local food is one of the best parts of a trip.", false),
    question(3, Trait::Openness, "I prefer returning to destinations I already know.", true),
    question(4, Trait::Conscientiousness, "I plan my itinerary well before I leave.", false),
    question(5, Trait::Conscientiousness, "I keep my bookings and documents neatly organised.", false),
    question(6, Trait::Conscientiousness, "I often decide what to do on the day itself.", true),
    question(7, Trait::Extraversion, "I enjoy meeting new people while travelling.", false),
    question(8, Trait::Extraversion, "Busy nightlife and crowded events give me energy.", false),
    question(9, Trait::Extraversion, "After a long day I need time alone to recharge.", true),
    question(10, Trait::Agreeableness, "I am happy to adapt my plans to what my companions want.", false),
    question(11, Trait::Agreeableness, "I try to keep the peace when a group disagrees.", false),
    question(12, Trait::Agreeableness, "I get irritated when others slow the group down.", true),
    question(13, Trait::Neuroticism, "Delays and cancellations stress me out a lot.", false),
    question(14, Trait::Neuroticism, "I worry about things going wrong before a trip.", false),
    question(15, Trait::Neuroticism, "I stay calm when plans fall apart.", true),
];

pub fn find_question(id: u16) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Build a trait profile from a complete set of questionnaire answers
///
/// Reverse-keyed answers are mirrored (`6 - value`), each trait's answers
/// are averaged and the 1-5 mean is rescaled linearly onto 0-100.
pub fn calculate_profile(answers: &[LikertAnswer]) -> Result<TraitProfile, PersonalityError> {
    let mut seen = HashSet::with_capacity(answers.len());
    let mut sums = [0.0_f64; 5];
    let mut counts = [0_u32; 5];

    for answer in answers {
        let question = find_question(answer.question_id)
            .ok_or(PersonalityError::UnknownQuestion(answer.question_id))?;

        if !(LIKERT_MIN..=LIKERT_MAX).contains(&answer.value) {
            return Err(PersonalityError::AnswerOutOfRange {
                question_id: answer.question_id,
                value: answer.value,
            });
        }

        if !seen.insert(answer.question_id) {
            return Err(PersonalityError::DuplicateAnswer(answer.question_id));
        }

        let value = if question.reversed {
            LIKERT_MIN + LIKERT_MAX - answer.value
        } else {
            answer.value
        };

        let slot = trait_slot(question.dimension);
        sums[slot] += f64::from(value);
        counts[slot] += 1;
    }

    if seen.len() != QUESTIONS.len() {
        return Err(PersonalityError::Incomplete {
            missing: QUESTIONS.len() - seen.len(),
            total: QUESTIONS.len(),
        });
    }

    let percent = |t: Trait| {
        let slot = trait_slot(t);
        let mean = sums[slot] / f64::from(counts[slot]);
        rescale(mean)
    };

    Ok(TraitProfile::new(
        percent(Trait::Openness),
        percent(Trait::Conscientiousness),
        percent(Trait::Extraversion),
        percent(Trait::Agreeableness),
        percent(Trait::Neuroticism),
    ))
}

#[inline]
fn trait_slot(t: Trait) -> usize {
    match t {
        Trait::Openness => 0,
        Trait::Conscientiousness => 1,
        Trait::Extraversion => 2,
        Trait::Agreeableness => 3,
        Trait::Neuroticism => 4,
    }
}

/// Map a 1-5 mean onto 0-100
#[inline]
fn rescale(mean: f64) -> f64 {
    let span = f64::from(LIKERT_MAX - LIKERT_MIN);
    (mean - f64::from(LIKERT_MIN)) / span * 100.0
}
