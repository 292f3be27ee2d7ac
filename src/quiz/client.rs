// src/quiz/client.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{answer_key::AnswerKeyMap, error::QuizError};
use crate::models::{answer_key::AnswerKeyEntry, submission::QuestionnaireRequest};

pub const ANSWER_KEY_PATH: &str = "api/correct-answers";
pub const REGISTRATION_PATH: &str = "api/registrations";
pub const QUESTIONNAIRE_PATH: &str = "api/questionnaires";

/// Remote operations the form controller depends on.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Loads the answer key. No retry is attempted.
    async fn fetch_answer_key(&self) -> Result<AnswerKeyMap, QuizError>;

    /// Registers a participant and returns the server-issued id.
    async fn register(&self, nickname: &str, number: &str) -> Result<String, QuizError>;

    async fn submit_questionnaire(&self, submission: &QuestionnaireRequest)
    -> Result<(), QuizError>;
}

/// HTTP client for the quiz API.
#[derive(Debug, Clone)]
pub struct QuizApiClient {
    http: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct RegistrationBody<'a> {
    nickname: &'a str,
    number: &'a str,
}

impl QuizApiClient {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, url::ParseError> {
        // A trailing slash keeps `join` from replacing the last path segment.
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    /// Fetches the answer-key rows and groups them by question.
    pub async fn fetch_answer_key(&self) -> Result<AnswerKeyMap, QuizError> {
        let url = self.endpoint(ANSWER_KEY_PATH).map_err(|e| QuizError::FetchFailed {
            status: None,
            message: e.to_string(),
        })?;

        let response = self.http.get(url).send().await.map_err(|e| {
            tracing::error!("Error fetching correct answers: {}", e);
            QuizError::FetchFailed {
                status: None,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            let message = error_message(&body, status);
            tracing::error!("Answer key endpoint returned {}: {}", status, message);
            return Err(QuizError::FetchFailed {
                status: Some(status.as_u16()),
                message,
            });
        }

        let rows: Vec<AnswerKeyEntry> =
            response.json().await.map_err(|e| QuizError::FetchFailed {
                status: Some(status.as_u16()),
                message: format!("Malformed answer key: {e}"),
            })?;

        tracing::info!("Loaded {} answer key rows", rows.len());
        Ok(AnswerKeyMap::from_entries(rows))
    }

    /// POSTs a JSON body and returns the JSON reply of a 2xx response.
    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value, QuizError> {
        let url = self
            .endpoint(path)
            .map_err(|e| QuizError::SubmissionFailed(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| QuizError::SubmissionFailed(e.to_string()))?;

        let status = response.status();
        let reply = response.json::<Value>().await;

        if !status.is_success() {
            let body = reply.unwrap_or(Value::Null);
            return Err(QuizError::SubmissionFailed(error_message(&body, status)));
        }

        reply.map_err(|e| QuizError::SubmissionFailed(format!("Malformed server response: {e}")))
    }
}

#[async_trait]
impl QuizBackend for QuizApiClient {
    async fn fetch_answer_key(&self) -> Result<AnswerKeyMap, QuizError> {
        QuizApiClient::fetch_answer_key(self).await
    }

    async fn register(&self, nickname: &str, number: &str) -> Result<String, QuizError> {
        let reply = self
            .post_json(REGISTRATION_PATH, &RegistrationBody { nickname, number })
            .await?;

        match reply.get("id") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(QuizError::SubmissionFailed(
                "Registration response did not contain an id".to_string(),
            )),
        }
    }

    async fn submit_questionnaire(
        &self,
        submission: &QuestionnaireRequest,
    ) -> Result<(), QuizError> {
        self.post_json(QUESTIONNAIRE_PATH, submission).await?;
        Ok(())
    }
}

/// Picks the server's `error` or `details` text, falling back to the status.
fn error_message(body: &Value, status: StatusCode) -> String {
    body.get("error")
        .or_else(|| body.get("details"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Server responded with status {}", status.as_u16()))
}
