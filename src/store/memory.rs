// src/store/memory.rs

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::Mutex;

use super::QuizStore;
use crate::{
    error::AppError,
    models::{
        answer_key::AnswerKeyEntry,
        registration::{NewRegistration, Registration},
        submission::{NewSubmission, Submission},
    },
};

/// Process-local store with the same ordering and id semantics as the
/// PostgreSQL tables. Can be switched into an unavailable mode where every
/// call fails like a lost database connection.
#[derive(Default)]
pub struct MemoryQuizStore {
    answers: Mutex<Vec<AnswerKeyEntry>>,
    registrations: Mutex<Vec<Registration>>,
    submissions: Mutex<Vec<Submission>>,
    unavailable: AtomicBool,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store preloaded with `(question_id, correct_answer)` pairs.
    pub fn with_answer_key<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        let answers = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (question_id, answer))| AnswerKeyEntry {
                id: idx as i64 + 1,
                question_id,
                correct_answer: answer.into(),
            })
            .collect();

        Self {
            answers: Mutex::new(answers),
            ..Self::default()
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().await.clone()
    }

    pub async fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().await.clone()
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn answer_key(&self) -> Result<Vec<AnswerKeyEntry>, AppError> {
        self.check_available()?;
        let mut rows = self.answers.lock().await.clone();
        rows.sort_by_key(|row| (row.question_id, row.id));
        Ok(rows)
    }

    async fn create_registration(&self, new: &NewRegistration) -> Result<Registration, AppError> {
        self.check_available()?;
        let mut registrations = self.registrations.lock().await;
        let registration = Registration {
            id: registrations.len() as i64 + 1,
            nickname: new.nickname.clone(),
            number: new.number.clone(),
            created_at: Some(Utc::now()),
        };
        registrations.push(registration.clone());
        Ok(registration)
    }

    async fn registration_exists(&self, id: i64) -> Result<bool, AppError> {
        self.check_available()?;
        Ok(self.registrations.lock().await.iter().any(|r| r.id == id))
    }

    async fn create_submission(&self, new: &NewSubmission) -> Result<Submission, AppError> {
        self.check_available()?;
        let mut submissions = self.submissions.lock().await;
        let submission = Submission {
            id: submissions.len() as i64 + 1,
            registration_id: new.registration_id,
            answers: Json(new.answers.clone()),
            score: new.score,
            created_at: Some(Utc::now()),
        };
        submissions.push(submission.clone());
        Ok(submission)
    }

    async fn current_time(&self) -> Result<chrono::DateTime<chrono::Utc>, AppError> {
        self.check_available()?;
        Ok(Utc::now())
    }
}
