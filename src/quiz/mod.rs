//! Client-side quiz core: answer key, scoring, persisted session state and
//! the form controller. Nothing here touches a DOM; the presentation layer
//! renders [`controller::QuizContext`] and forwards [`controller::QuizEvent`]s.

pub mod answer_key;
pub mod client;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod scorer;
pub mod storage;

pub use answer_key::{AnswerKeyMap, Answers, QUESTION_COUNT, QuestionId};
pub use client::{QuizApiClient, QuizBackend};
pub use controller::{Form, FormController, FormField, QuizContext, QuizEvent, QuizResults};
pub use error::{CorruptedSessionState, QuizError};
pub use lifecycle::{
    Clock, FRESHNESS_WINDOW_MS, SessionAction, SessionDecision, SessionLifecycleManager,
    SystemClock,
};
pub use storage::{
    KeyValueStorage, MemoryStorage, PersistedSessionStore, RegistrationIdentity, Section,
    SessionRecord,
};
