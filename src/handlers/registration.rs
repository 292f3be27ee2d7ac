// src/handlers/registration.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::registration::{MAX_NICKNAME_LENGTH, NewRegistration, RegistrationRequest},
    store::QuizStore,
};

/// Registers a quiz participant.
///
/// Nickname and number are required once trimmed. Returns 201 Created with
/// the stored row; the client keeps its `id` as the registration id.
pub async fn submit_registration(
    State(store): State<Arc<dyn QuizStore>>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new = NewRegistration::from(payload);
    if new.nickname.is_empty() {
        return Err(AppError::BadRequest("Nickname contains no text".to_string()));
    }
    if new.nickname.chars().count() > MAX_NICKNAME_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Nickname must be at most {MAX_NICKNAME_LENGTH} characters."
        )));
    }

    let registration = store.create_registration(&new).await?;
    tracing::info!(id = registration.id, "Registration stored");

    Ok((StatusCode::CREATED, Json(registration)))
}
