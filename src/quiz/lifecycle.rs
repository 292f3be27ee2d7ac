// src/quiz/lifecycle.rs

use super::storage::{KeyValueStorage, PersistedSessionStore, SessionRecord, Section};

/// Reloads closer together than this belong to the same session.
pub const FRESHNESS_WINDOW_MS: i64 = 300_000;

/// Source of wall-clock time in epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// What the page does with persisted data on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Everything was wiped; start at registration.
    ClearAll,
    /// Saved form data is restored and the given section shown.
    KeepAndRestore(Section),
    /// Data is kept but there is no form state to restore.
    KeepAndStartFresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDecision {
    pub action: SessionAction,
    /// Form values to put back, present only for `KeepAndRestore`.
    pub restored: Option<SessionRecord>,
}

impl SessionDecision {
    fn cleared() -> Self {
        Self {
            action: SessionAction::ClearAll,
            restored: None,
        }
    }

    fn start_fresh() -> Self {
        Self {
            action: SessionAction::KeepAndStartFresh,
            restored: None,
        }
    }

    /// Section the presentation layer should show.
    pub fn visible_section(&self) -> Section {
        match self.action {
            SessionAction::KeepAndRestore(section) => section,
            SessionAction::ClearAll | SessionAction::KeepAndStartFresh => Section::Registration,
        }
    }
}

/// Decides, once per page load, whether persisted data is fresh, stale or
/// corrupted.
#[derive(Debug, Clone, Default)]
pub struct SessionLifecycleManager<C> {
    clock: C,
}

impl<C: Clock> SessionLifecycleManager<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Evaluates persisted state and stamps the visit time.
    ///
    /// Never fails: anything inconsistent or unreadable is wiped and the
    /// visitor lands on registration.
    pub fn decide_session_state<S: KeyValueStorage>(
        &self,
        store: &mut PersistedSessionStore<S>,
    ) -> SessionDecision {
        let now = self.clock.now_millis();

        let has_record = store.has_stored_record();
        let has_existing_data = has_record || store.has_any_identity_key();
        let is_fresh_visit = match store.visit_timestamp() {
            None => true,
            // Stored values are untrusted; an overflowing age is simply old.
            Some(last_visit) => now
                .checked_sub(last_visit)
                .is_none_or(|age| age > FRESHNESS_WINDOW_MS),
        };

        let decision = if is_fresh_visit && !has_existing_data {
            tracing::debug!("Fresh visit without saved data");
            store.clear();
            SessionDecision::cleared()
        } else if is_fresh_visit && has_record && store.registration_identity().is_none() {
            tracing::warn!(
                "Saved questionnaire data without registration identity, clearing storage"
            );
            store.clear();
            SessionDecision::cleared()
        } else {
            // Same-session reloads skip the check above; restore re-validates.
            Self::restore(store)
        };

        store.set_visit_timestamp(now);
        decision
    }

    fn restore<S: KeyValueStorage>(store: &mut PersistedSessionStore<S>) -> SessionDecision {
        let record = match store.try_load() {
            Ok(Some(record)) => record,
            Ok(None) => return SessionDecision::start_fresh(),
            Err(e) => {
                tracing::warn!("{}, clearing storage", e);
                store.clear();
                return SessionDecision::cleared();
            }
        };

        let has_identity = store.registration_identity().is_some();
        if record.current_section.requires_registration() && !has_identity {
            tracing::warn!(
                section = ?record.current_section,
                "No registration identity for saved section, clearing storage"
            );
            store.clear();
            return SessionDecision::cleared();
        }

        let resumable = !record.nickname.is_empty() && !record.number.is_empty() && has_identity;
        let section = match record.current_section {
            Section::Registration => Section::Registration,
            // Results cannot be rebuilt; resume the questionnaire instead.
            Section::Questionnaire | Section::Results if resumable => Section::Questionnaire,
            Section::Questionnaire | Section::Results => Section::Registration,
        };

        tracing::info!(?section, "Restoring saved session");
        SessionDecision {
            action: SessionAction::KeepAndRestore(section),
            restored: Some(record),
        }
    }
}
