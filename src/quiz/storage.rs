// src/quiz/storage.rs

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{Deserialize, Serialize};

use super::{
    answer_key::{Answers, QuestionId},
    error::CorruptedSessionState,
};

/// Key holding the JSON encoded [`SessionRecord`].
pub const FORM_DATA_KEY: &str = "vocabularyTestFormData";
pub const REGISTRATION_ID_KEY: &str = "registrationId";
pub const USER_NICKNAME_KEY: &str = "userNickname";
/// Epoch milliseconds of the last page-load evaluation.
pub const LAST_VISIT_KEY: &str = "lastVisitTime";

/// String keyed, string valued storage that survives page reloads.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Storage held in process memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// One storage shared by several tabs of the same browsing context.
impl<S: KeyValueStorage> KeyValueStorage for Rc<RefCell<S>> {
    fn get(&self, key: &str) -> Option<String> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.borrow_mut().set(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.borrow_mut().remove(key);
    }
}

/// Page section the visitor was on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Registration,
    Questionnaire,
    Results,
}

impl Section {
    /// Sections that only make sense after a successful registration.
    pub fn requires_registration(self) -> bool {
        matches!(self, Section::Questionnaire | Section::Results)
    }
}

/// In-progress form state, rewritten on every input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub answers: Answers,
    #[serde(default)]
    pub current_section: Section,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            number: String::new(),
            answers: QuestionId::all().map(|q| (q, String::new())).collect(),
            current_section: Section::Registration,
        }
    }
}

impl SessionRecord {
    /// Answer for `question`, empty when none was typed.
    pub fn answer(&self, question: QuestionId) -> &str {
        self.answers.get(&question).map(String::as_str).unwrap_or("")
    }
}

/// Server-issued registration id together with the nickname it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationIdentity {
    pub registration_id: String,
    pub nickname: String,
}

/// Typed access to the four persisted keys.
///
/// Every operation is total: missing keys read as absent, and writes never
/// fail.
#[derive(Debug, Clone, Default)]
pub struct PersistedSessionStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> PersistedSessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn save(&mut self, record: &SessionRecord) {
        match serde_json::to_string(record) {
            Ok(json) => self.storage.set(FORM_DATA_KEY, &json),
            Err(e) => tracing::error!("Failed to encode session record: {}", e),
        }
    }

    /// The stored record, with unreadable data reported as absent.
    pub fn load(&self) -> Option<SessionRecord> {
        self.try_load().ok().flatten()
    }

    /// Like [`load`](Self::load) but tells malformed data apart from absence.
    pub fn try_load(&self) -> Result<Option<SessionRecord>, CorruptedSessionState> {
        let Some(raw) = self.non_empty(FORM_DATA_KEY) else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CorruptedSessionState(format!("unreadable form data: {e}")))
    }

    /// Whether any form data is stored, readable or not. An empty value
    /// counts as absent.
    pub fn has_stored_record(&self) -> bool {
        self.non_empty(FORM_DATA_KEY).is_some()
    }

    /// Removes every persisted key.
    pub fn clear(&mut self) {
        for key in [FORM_DATA_KEY, REGISTRATION_ID_KEY, USER_NICKNAME_KEY, LAST_VISIT_KEY] {
            self.storage.remove(key);
        }
    }

    /// Present only when both id and nickname are stored and non-empty.
    pub fn registration_identity(&self) -> Option<RegistrationIdentity> {
        let registration_id = self.registration_id()?;
        let nickname = self.user_nickname()?;

        Some(RegistrationIdentity {
            registration_id,
            nickname,
        })
    }

    pub fn set_registration_identity(&mut self, registration_id: &str, nickname: &str) {
        self.storage.set(REGISTRATION_ID_KEY, registration_id);
        self.storage.set(USER_NICKNAME_KEY, nickname);
    }

    pub fn registration_id(&self) -> Option<String> {
        self.non_empty(REGISTRATION_ID_KEY)
    }

    pub fn user_nickname(&self) -> Option<String> {
        self.non_empty(USER_NICKNAME_KEY)
    }

    /// Whether either identity key is set, even if the other is missing.
    pub fn has_any_identity_key(&self) -> bool {
        self.registration_id().is_some() || self.user_nickname().is_some()
    }

    /// Last visit time; an unparseable value reads as absent.
    pub fn visit_timestamp(&self) -> Option<i64> {
        self.storage
            .get(LAST_VISIT_KEY)
            .and_then(|raw| raw.trim().parse().ok())
    }

    pub fn set_visit_timestamp(&mut self, millis: i64) {
        self.storage.set(LAST_VISIT_KEY, &millis.to_string());
    }

    pub fn clear_visit_timestamp(&mut self) {
        self.storage.remove(LAST_VISIT_KEY);
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.storage.get(key).filter(|value| !value.is_empty())
    }
}
