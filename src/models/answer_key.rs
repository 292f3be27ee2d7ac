// src/models/answer_key.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents one row of the 'correct_answers' table.
///
/// Several rows may share a `question_id` when more than one spelling is
/// accepted for the same word.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    pub id: i64,

    /// 1-based question number (1..=10).
    pub question_id: i32,

    /// One accepted answer, compared case- and whitespace-insensitively.
    pub correct_answer: String,
}
