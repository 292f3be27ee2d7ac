// src/handlers/health.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{error::AppError, store::QuizStore};

/// Checks that the database answers a trivial query.
pub async fn database_health(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let now = store.current_time().await?;

    Ok(Json(json!({
        "success": true,
        "message": "Database connection successful",
        "currentTime": now,
    })))
}
