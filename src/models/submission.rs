// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

use crate::models::registration::validate_not_blank;

/// Longest answer accepted for a single question.
pub const MAX_ANSWER_LENGTH: usize = 200;

/// One answered question as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    /// Human readable label, e.g. "Question 3".
    pub question: String,
    pub answer: String,
}

/// DTO for submitting the questionnaire.
///
/// The score is computed client-side and stored as reported.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireRequest {
    #[validate(custom(function = validate_not_blank))]
    pub registration_id: String,
    #[validate(
        length(min = 1, max = 10, message = "Between 1 and 10 answers are required."),
        custom(function = validate_answers)
    )]
    pub answers: Vec<SubmittedAnswer>,
    #[validate(range(min = 0, max = 10, message = "Score must be between 0 and 10."))]
    pub score: i32,
}

/// Represents the 'questionnaire_submissions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: i64,
    pub registration_id: i64,
    pub answers: Json<Vec<SubmittedAnswer>>,
    pub score: i32,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Submission data with the registration id resolved to its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub registration_id: i64,
    pub answers: Vec<SubmittedAnswer>,
    pub score: i32,
}

fn validate_answers(answers: &[SubmittedAnswer]) -> Result<(), validator::ValidationError> {
    for item in answers {
        if item.answer.chars().count() > MAX_ANSWER_LENGTH {
            return Err(validator::ValidationError::new("answer_too_long"));
        }
        if item.question.trim().is_empty() {
            return Err(validator::ValidationError::new("question_label_missing"));
        }
    }
    Ok(())
}
