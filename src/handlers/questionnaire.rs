// src/handlers/questionnaire.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::submission::{NewSubmission, QuestionnaireRequest},
    store::QuizStore,
};

/// Stores a completed questionnaire for an existing registration.
///
/// * Validates answer count and score range.
/// * Rejects unknown registration ids with 404.
/// * The score is stored exactly as computed by the client.
pub async fn submit_questionnaire(
    State(store): State<Arc<dyn QuizStore>>,
    Json(payload): Json<QuestionnaireRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let registration_id = payload
        .registration_id
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest("Invalid registration id".to_string()))?;

    if !store.registration_exists(registration_id).await? {
        return Err(AppError::NotFound(format!(
            "Registration {} not found",
            registration_id
        )));
    }

    let submission = store
        .create_submission(&NewSubmission {
            registration_id,
            answers: payload.answers,
            score: payload.score,
        })
        .await?;

    tracing::info!(
        id = submission.id,
        registration_id,
        score = submission.score,
        "Questionnaire stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": submission.id,
            "message": "Questionnaire submitted successfully"
        })),
    ))
}
