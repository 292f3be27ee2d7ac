// src/store/mod.rs

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        answer_key::AnswerKeyEntry,
        registration::{NewRegistration, Registration},
        submission::{NewSubmission, Submission},
    },
};

pub use memory::MemoryQuizStore;
pub use postgres::PgQuizStore;

/// Persistence used by the HTTP handlers.
///
/// The PostgreSQL implementation backs the deployed service; the in-memory
/// one backs the integration tests.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// All accepted answers, ordered by `question_id` then `id`.
    async fn answer_key(&self) -> Result<Vec<AnswerKeyEntry>, AppError>;

    async fn create_registration(&self, new: &NewRegistration) -> Result<Registration, AppError>;

    async fn registration_exists(&self, id: i64) -> Result<bool, AppError>;

    async fn create_submission(&self, new: &NewSubmission) -> Result<Submission, AppError>;

    /// Round-trips to the database and returns its clock.
    async fn current_time(&self) -> Result<chrono::DateTime<chrono::Utc>, AppError>;
}
