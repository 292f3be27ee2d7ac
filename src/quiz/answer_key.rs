// src/quiz/answer_key.rs

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::answer_key::AnswerKeyEntry;

/// Number of questions in the quiz.
pub const QUESTION_COUNT: u8 = 10;

/// A question number in `1..=QUESTION_COUNT`.
///
/// Serialized as its storage key, `question<N>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(u8);

impl QuestionId {
    pub fn new(number: u8) -> Option<Self> {
        (1..=QUESTION_COUNT).contains(&number).then_some(Self(number))
    }

    /// Every question, in order.
    pub fn all() -> impl Iterator<Item = QuestionId> {
        (1..=QUESTION_COUNT).map(QuestionId)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Label sent to the questionnaire endpoint, e.g. "Question 3".
    pub fn label(self) -> String {
        format!("Question {}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "question{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("question")
            .and_then(|n| n.parse::<u8>().ok())
            .and_then(QuestionId::new)
            .ok_or_else(|| format!("invalid question key: {s}"))
    }
}

impl TryFrom<String> for QuestionId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.to_string()
    }
}

/// A visitor's answers keyed by question.
pub type Answers = BTreeMap<QuestionId, String>;

/// Accepted answers per question, in fetch order.
///
/// A question without entries has no accepted answers, so nothing typed for
/// it can be correct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKeyMap {
    accepted: BTreeMap<QuestionId, Vec<String>>,
}

impl AnswerKeyMap {
    /// Groups answer-key rows by question. Rows for question numbers
    /// outside the quiz are skipped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = AnswerKeyEntry>,
    {
        let mut map = Self::default();
        for entry in entries {
            match u8::try_from(entry.question_id).ok().and_then(QuestionId::new) {
                Some(question) => map.insert(question, entry.correct_answer),
                None => tracing::debug!(
                    "Skipping answer key row {} for unknown question {}",
                    entry.id,
                    entry.question_id
                ),
            }
        }
        map
    }

    pub fn insert(&mut self, question: QuestionId, answer: impl Into<String>) {
        self.accepted.entry(question).or_default().push(answer.into());
    }

    pub fn accepted(&self, question: QuestionId) -> &[String] {
        self.accepted
            .get(&question)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True until at least one answer has been loaded.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Number of questions with at least one accepted answer.
    pub fn len(&self) -> usize {
        self.accepted.len()
    }
}

impl<S: Into<String>> FromIterator<(QuestionId, S)> for AnswerKeyMap {
    fn from_iter<T: IntoIterator<Item = (QuestionId, S)>>(iter: T) -> Self {
        let mut map = Self::default();
        for (question, answer) in iter {
            map.insert(question, answer);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, question_id: i32, answer: &str) -> AnswerKeyEntry {
        AnswerKeyEntry {
            id,
            question_id,
            correct_answer: answer.to_string(),
        }
    }

    #[test]
    fn question_keys_parse_and_print() {
        let q3 = QuestionId::new(3).unwrap();
        assert_eq!(q3.to_string(), "question3");
        assert_eq!("question3".parse::<QuestionId>().unwrap(), q3);
        assert!("question0".parse::<QuestionId>().is_err());
        assert!("question11".parse::<QuestionId>().is_err());
        assert!("answer1".parse::<QuestionId>().is_err());
    }

    #[test]
    fn entries_group_in_fetch_order() {
        let map = AnswerKeyMap::from_entries(vec![
            entry(1, 1, "server"),
            entry(2, 2, "souvenir"),
            entry(3, 2, "souvenier"),
            entry(4, 42, "ignored"),
        ]);

        let q2 = QuestionId::new(2).unwrap();
        assert_eq!(map.accepted(q2), ["souvenir", "souvenier"]);
        assert_eq!(map.len(), 2);
        assert!(map.accepted(QuestionId::new(5).unwrap()).is_empty());
    }
}
