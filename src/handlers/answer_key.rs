// src/handlers/answer_key.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, store::QuizStore};

/// Returns the full answer key.
///
/// Rows are ordered by `question_id` then `id`, so the first accepted
/// answer of each question is the one shown as the correction.
pub async fn get_correct_answers(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let rows = store.answer_key().await?;
    tracing::info!("Serving answer key with {} rows", rows.len());

    Ok(Json(rows))
}
