// src/quiz/controller.rs

use std::collections::BTreeSet;

use serde::Serialize;

use super::{
    answer_key::{AnswerKeyMap, Answers, QuestionId},
    client::QuizBackend,
    error::QuizError,
    lifecycle::{Clock, SessionDecision, SessionLifecycleManager},
    scorer::{self, QuestionResult, ScoreBand},
    storage::{KeyValueStorage, PersistedSessionStore, SessionRecord, Section},
};
use crate::models::submission::{QuestionnaireRequest, SubmittedAnswer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FormField {
    Nickname,
    Number,
    Answer(QuestionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Form {
    Registration,
    Questionnaire,
}

/// Everything the page reports to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    InputChanged { field: FormField, value: String },
    FormSubmitted(Form),
    /// The tab was hidden (mobile browsers may kill it afterwards).
    VisibilityHidden,
    Unloaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Final score card shown after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResults {
    pub score: u8,
    pub band: ScoreBand,
    pub nickname: String,
    pub details: Vec<QuestionResult>,
}

/// State of one page, owned by its controller.
#[derive(Debug, Clone, Default)]
pub struct QuizContext {
    pub answer_key: AnswerKeyMap,
    pub visible: Section,
    pub nickname: String,
    pub number: String,
    pub answers: Answers,
    /// Fields currently highlighted as missing.
    pub error_fields: BTreeSet<FormField>,
    pub status: Option<StatusMessage>,
    /// Forms that were submitted successfully and stay disabled.
    pub locked_forms: BTreeSet<Form>,
    pub results: Option<QuizResults>,
}

impl QuizContext {
    pub fn is_locked(&self, form: Form) -> bool {
        self.locked_forms.contains(&form)
    }

    fn record(&self) -> SessionRecord {
        SessionRecord {
            nickname: self.nickname.clone(),
            number: self.number.clone(),
            answers: QuestionId::all()
                .map(|q| (q, self.answers.get(&q).cloned().unwrap_or_default()))
                .collect(),
            current_section: self.visible,
        }
    }

    fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Nickname => self.nickname = value,
            FormField::Number => self.number = value,
            FormField::Answer(q) => {
                self.answers.insert(q, value);
            }
        }
    }

    fn fail(&mut self, error: QuizError) -> Result<(), QuizError> {
        if let QuizError::Validation { fields, .. } = &error {
            self.error_fields.extend(fields.iter().copied());
        }
        self.status = Some(StatusMessage::new(StatusKind::Error, error.to_string()));
        Err(error)
    }
}

/// Drives one page: applies events to the [`QuizContext`], persists form
/// state and talks to the backend.
pub struct FormController<S, B, C> {
    store: PersistedSessionStore<S>,
    backend: B,
    lifecycle: SessionLifecycleManager<C>,
    context: QuizContext,
}

impl<S, B, C> FormController<S, B, C>
where
    S: KeyValueStorage,
    B: QuizBackend,
    C: Clock,
{
    pub fn new(storage: S, backend: B, clock: C) -> Self {
        Self {
            store: PersistedSessionStore::new(storage),
            backend,
            lifecycle: SessionLifecycleManager::new(clock),
            context: QuizContext::default(),
        }
    }

    pub fn context(&self) -> &QuizContext {
        &self.context
    }

    pub fn store(&self) -> &PersistedSessionStore<S> {
        &self.store
    }

    /// Page load: loads the answer key, then restores or discards saved data.
    ///
    /// On `FetchFailed` nothing else happens; calling this again is the retry.
    pub async fn initialize(&mut self) -> Result<SessionDecision, QuizError> {
        self.context = QuizContext {
            status: Some(StatusMessage::new(StatusKind::Info, "Loading quiz...")),
            ..QuizContext::default()
        };

        match self.backend.fetch_answer_key().await {
            Ok(key) => self.context.answer_key = key,
            Err(e) => {
                tracing::error!("Failed to load correct answers: {}", e);
                self.context.status = Some(StatusMessage::new(
                    StatusKind::Error,
                    "Failed to load quiz data. Please refresh the page.",
                ));
                return Err(e);
            }
        }
        self.context.status = None;

        let decision = self.lifecycle.decide_session_state(&mut self.store);
        if let Some(record) = &decision.restored {
            self.context.nickname = record.nickname.clone();
            self.context.number = record.number.clone();
            self.context.answers = record
                .answers
                .iter()
                .filter(|(_, answer)| !answer.is_empty())
                .map(|(q, answer)| (*q, answer.clone()))
                .collect();
        }
        self.context.visible = decision.visible_section();

        Ok(decision)
    }

    /// Applies one event. Errors are also reflected in the context status.
    pub async fn dispatch(&mut self, event: QuizEvent) -> Result<(), QuizError> {
        match event {
            QuizEvent::InputChanged { field, value } => {
                self.context.set_field(field, value);
                self.context.error_fields.remove(&field);
                let registration_field = matches!(field, FormField::Nickname | FormField::Number);
                if registration_field
                    && self
                        .context
                        .status
                        .as_ref()
                        .is_some_and(|s| s.kind == StatusKind::Error)
                {
                    self.context.status = None;
                }
                self.save_form();
                Ok(())
            }
            QuizEvent::FormSubmitted(Form::Registration) => self.submit_registration().await,
            QuizEvent::FormSubmitted(Form::Questionnaire) => self.submit_questionnaire().await,
            QuizEvent::VisibilityHidden => {
                self.save_form();
                Ok(())
            }
            QuizEvent::Unloaded => {
                if self.context.visible == Section::Results {
                    // Next visit starts as a fresh one.
                    self.store.clear_visit_timestamp();
                } else {
                    self.save_form();
                }
                Ok(())
            }
        }
    }

    fn save_form(&mut self) {
        // A completed quiz leaves nothing behind.
        if self.context.visible == Section::Results {
            return;
        }
        self.store.save(&self.context.record());
    }

    async fn submit_registration(&mut self) -> Result<(), QuizError> {
        if self.context.is_locked(Form::Registration) {
            tracing::debug!("Registration already submitted, ignoring");
            return Ok(());
        }

        let nickname = self.context.nickname.trim().to_string();
        let number = self.context.number.trim().to_string();

        let mut missing = Vec::new();
        if nickname.is_empty() {
            missing.push(FormField::Nickname);
        }
        if number.is_empty() {
            missing.push(FormField::Number);
        }
        if !missing.is_empty() {
            return self.context.fail(QuizError::Validation {
                fields: missing,
                message: "Please fill in all fields".to_string(),
            });
        }
        self.context.error_fields.remove(&FormField::Nickname);
        self.context.error_fields.remove(&FormField::Number);

        self.context.status = Some(StatusMessage::new(StatusKind::Info, "Submitting..."));
        tracing::info!(%nickname, %number, "Submitting registration");

        match self.backend.register(&nickname, &number).await {
            Ok(registration_id) => {
                tracing::info!(%registration_id, "Registration successful");
                self.store.set_registration_identity(&registration_id, &nickname);
                self.context.locked_forms.insert(Form::Registration);
                self.context.status = Some(StatusMessage::new(StatusKind::Success, "Good luck"));
                self.context.visible = Section::Questionnaire;
                self.save_form();
                Ok(())
            }
            Err(e) => {
                tracing::error!("Registration error: {}", e);
                self.context.fail(e)
            }
        }
    }

    async fn submit_questionnaire(&mut self) -> Result<(), QuizError> {
        if self.context.is_locked(Form::Questionnaire) {
            tracing::debug!("Questionnaire already submitted, ignoring");
            return Ok(());
        }

        if self.context.answer_key.is_empty() {
            return self.context.fail(QuizError::Validation {
                fields: Vec::new(),
                message: "Quiz data not loaded. Please refresh the page.".to_string(),
            });
        }

        let mut answers = Answers::new();
        let mut missing = Vec::new();
        for question in QuestionId::all() {
            let answer = self
                .context
                .answers
                .get(&question)
                .map(|a| a.trim())
                .unwrap_or("");
            self.context.error_fields.remove(&FormField::Answer(question));
            if answer.is_empty() {
                missing.push(FormField::Answer(question));
            } else {
                answers.insert(question, answer.to_string());
            }
        }
        if !missing.is_empty() {
            return self.context.fail(QuizError::Validation {
                fields: missing,
                message: "Please answer all questions".to_string(),
            });
        }

        let Some(registration_id) = self.store.registration_id() else {
            return self.context.fail(QuizError::SubmissionFailed(
                "Registration information missing. Please start over.".to_string(),
            ));
        };

        let score = scorer::score(&answers, &self.context.answer_key);
        let payload = QuestionnaireRequest {
            registration_id,
            answers: answers
                .iter()
                .map(|(q, answer)| SubmittedAnswer {
                    question: q.label(),
                    answer: answer.clone(),
                })
                .collect(),
            score: i32::from(score),
        };

        self.context.status = Some(StatusMessage::new(StatusKind::Info, "Submitting..."));
        tracing::info!(
            registration_id = %payload.registration_id,
            score,
            "Submitting questionnaire"
        );

        if let Err(e) = self.backend.submit_questionnaire(&payload).await {
            tracing::error!("Questionnaire error: {}", e);
            return self.context.fail(e);
        }

        let nickname = self
            .store
            .user_nickname()
            .unwrap_or_else(|| "User".to_string());
        self.context.results = Some(QuizResults {
            score,
            band: ScoreBand::for_score(score),
            nickname,
            details: scorer::detailed_results(&answers, &self.context.answer_key),
        });

        self.store.clear();
        self.context.locked_forms.insert(Form::Questionnaire);
        self.context.status = None;
        self.context.visible = Section::Results;
        Ok(())
    }
}
