// src/quiz/scorer.rs

use serde::Serialize;

use super::answer_key::{AnswerKeyMap, Answers, QuestionId};

/// Canonical form used on both sides of a comparison.
fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Checks one answer against every accepted answer for the question.
/// Case and surrounding whitespace are ignored.
pub fn is_correct(question: QuestionId, user_answer: &str, key: &AnswerKeyMap) -> bool {
    let accepted = key.accepted(question);
    if accepted.is_empty() {
        return false;
    }

    let normalized = normalize(user_answer);
    accepted.iter().any(|answer| normalize(answer) == normalized)
}

/// Number of correctly answered questions, between 0 and 10.
pub fn score(answers: &Answers, key: &AnswerKeyMap) -> u8 {
    QuestionId::all()
        .filter(|q| {
            answers
                .get(q)
                .is_some_and(|answer| is_correct(*q, answer, key))
        })
        .count() as u8
}

/// Colour band of the results card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            7.. => ScoreBand::High,
            4..=6 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }
}

/// Per-question line of the detailed results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub question: QuestionId,
    /// Empty when the question was left blank.
    pub user_answer: String,
    pub correct: bool,
    /// First accepted answer, only present for incorrect responses.
    pub expected: Option<String>,
}

pub fn detailed_results(answers: &Answers, key: &AnswerKeyMap) -> Vec<QuestionResult> {
    QuestionId::all()
        .map(|question| {
            let user_answer = answers.get(&question).cloned().unwrap_or_default();
            let correct = is_correct(question, &user_answer, key);
            let expected = if correct {
                None
            } else {
                key.accepted(question).first().cloned()
            };

            QuestionResult {
                question,
                user_answer,
                correct,
                expected,
            }
        })
        .collect()
}
