// src/models/registration.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::html::clean_html;

/// Width of the `registrations.nickname` column.
pub const MAX_NICKNAME_LENGTH: usize = 50;

/// Represents the 'registrations' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub nickname: String,
    pub number: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for registering a quiz participant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(
        custom(function = validate_not_blank),
        length(max = 50, message = "Nickname must be at most 50 characters.")
    )]
    pub nickname: String,
    #[validate(
        custom(function = validate_not_blank),
        length(max = 20, message = "Number must be at most 20 characters.")
    )]
    pub number: String,
}

/// Registration data ready to be stored: trimmed, nickname sanitised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub nickname: String,
    pub number: String,
}

impl From<RegistrationRequest> for NewRegistration {
    fn from(req: RegistrationRequest) -> Self {
        Self {
            nickname: clean_html(req.nickname.trim()),
            number: req.number.trim().to_string(),
        }
    }
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required")
            .with_message("Please fill in all fields".into()));
    }
    Ok(())
}
