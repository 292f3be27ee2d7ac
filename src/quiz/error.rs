// src/quiz/error.rs

use thiserror::Error;

use super::controller::FormField;

/// Failures reported to the visitor. None of them is fatal; each leaves the
/// page in a state where the action can be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// Required input missing. Nothing was sent.
    #[error("{message}")]
    Validation {
        fields: Vec<FormField>,
        message: String,
    },

    /// The answer key could not be loaded; the quiz stays blocked until a
    /// retry succeeds.
    #[error("Failed to load quiz data: {message}")]
    FetchFailed { status: Option<u16>, message: String },

    /// A registration or questionnaire write was rejected or never arrived.
    #[error("{0}")]
    SubmissionFailed(String),
}

/// Persisted data that cannot be trusted. Recovered by clearing storage and is
/// never shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("corrupted session state: {0}")]
pub struct CorruptedSessionState(pub String);
