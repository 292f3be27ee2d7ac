// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use super::QuizStore;
use crate::{
    error::AppError,
    models::{
        answer_key::AnswerKeyEntry,
        registration::{NewRegistration, Registration},
        submission::{NewSubmission, Submission},
    },
};

#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn answer_key(&self) -> Result<Vec<AnswerKeyEntry>, AppError> {
        let rows = sqlx::query_as::<_, AnswerKeyEntry>(
            r#"
            SELECT id, question_id, correct_answer
            FROM correct_answers
            ORDER BY question_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch correct answers: {:?}", e);
            AppError::from(e)
        })?;

        tracing::debug!("Fetched {} answer key rows", rows.len());
        Ok(rows)
    }

    async fn create_registration(&self, new: &NewRegistration) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (nickname, number)
            VALUES ($1, $2)
            RETURNING id, nickname, number, created_at
            "#,
        )
        .bind(&new.nickname)
        .bind(&new.number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert registration: {:?}", e);
            AppError::from(e)
        })
    }

    async fn registration_exists(&self, id: i64) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM registrations WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn create_submission(&self, new: &NewSubmission) -> Result<Submission, AppError> {
        sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO questionnaire_submissions (registration_id, answers, score)
            VALUES ($1, $2, $3)
            RETURNING id, registration_id, answers, score, created_at
            "#,
        )
        .bind(new.registration_id)
        .bind(Json(new.answers.clone()))
        .bind(new.score)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert questionnaire submission: {:?}", e);
            AppError::from(e)
        })
    }

    async fn current_time(&self) -> Result<chrono::DateTime<chrono::Utc>, AppError> {
        let now: chrono::DateTime<chrono::Utc> = sqlx::query_scalar("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }
}
