// tests/session_tests.rs

use vocab_quiz::quiz::{
    FRESHNESS_WINDOW_MS, KeyValueStorage, MemoryStorage, PersistedSessionStore, QuestionId,
    Section, SessionAction, SessionLifecycleManager, SessionRecord,
    lifecycle::Clock,
    storage::{FORM_DATA_KEY, LAST_VISIT_KEY, REGISTRATION_ID_KEY, USER_NICKNAME_KEY},
};

const NOW: i64 = 1_700_000_000_000;

struct FixedClock(i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

fn manager(now: i64) -> SessionLifecycleManager<FixedClock> {
    SessionLifecycleManager::new(FixedClock(now))
}

fn empty_store() -> PersistedSessionStore<MemoryStorage> {
    PersistedSessionStore::new(MemoryStorage::new())
}

fn record(section: Section) -> SessionRecord {
    let mut record = SessionRecord {
        nickname: "Ana".to_string(),
        number: "7".to_string(),
        current_section: section,
        ..SessionRecord::default()
    };
    record
        .answers
        .insert(QuestionId::new(1).unwrap(), "server".to_string());
    record
}

/// Registered visitor who was on `section`, last seen `age` ms before NOW.
fn registered_store(section: Section, age: i64) -> PersistedSessionStore<MemoryStorage> {
    let mut store = empty_store();
    store.save(&record(section));
    store.set_registration_identity("42", "Ana");
    store.set_visit_timestamp(NOW - age);
    store
}

#[test]
fn save_then_load_round_trips() {
    let mut store = empty_store();
    let mut original = record(Section::Questionnaire);
    for id in QuestionId::all() {
        original.answers.insert(id, format!("answer {}", id.number()));
    }

    store.save(&original);

    assert_eq!(store.load(), Some(original));
}

#[test]
fn record_uses_the_browser_key_layout() {
    let mut store = empty_store();
    store.save(&record(Section::Questionnaire));

    let raw = store.storage().get(FORM_DATA_KEY).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["currentSection"], "questionnaire");
    assert_eq!(json["answers"]["question1"], "server");
    assert_eq!(json["answers"]["question10"], "");
}

#[test]
fn first_visit_clears_and_stamps() {
    let mut store = empty_store();

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::ClearAll);
    assert_eq!(decision.visible_section(), Section::Registration);
    assert_eq!(store.visit_timestamp(), Some(NOW));
}

#[test]
fn stale_timestamp_without_data_clears() {
    let mut store = empty_store();
    store.set_visit_timestamp(NOW - FRESHNESS_WINDOW_MS * 10);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::ClearAll);
    assert_eq!(store.visit_timestamp(), Some(NOW));
}

#[test]
fn reload_within_window_restores_questionnaire() {
    let mut store = registered_store(Section::Questionnaire, 1_000);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(
        decision.action,
        SessionAction::KeepAndRestore(Section::Questionnaire)
    );
    assert_eq!(decision.restored, Some(record(Section::Questionnaire)));
    assert_eq!(store.visit_timestamp(), Some(NOW));
}

#[test]
fn rapid_reloads_are_idempotent() {
    let mut store = registered_store(Section::Questionnaire, 1_000);
    let manager = manager(NOW);

    let first = manager.decide_session_state(&mut store);
    let second = manager.decide_session_state(&mut store);

    assert_eq!(first.action, SessionAction::KeepAndRestore(Section::Questionnaire));
    assert_eq!(first, second);
}

#[test]
fn long_absence_keeps_valid_work() {
    let mut store = registered_store(Section::Questionnaire, FRESHNESS_WINDOW_MS + 1);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(
        decision.action,
        SessionAction::KeepAndRestore(Section::Questionnaire)
    );
    assert!(store.load().is_some());
    assert_eq!(store.visit_timestamp(), Some(NOW));
}

#[test]
fn exactly_at_window_is_same_session() {
    let mut store = empty_store();
    store.set_visit_timestamp(NOW - FRESHNESS_WINDOW_MS);

    let decision = manager(NOW).decide_session_state(&mut store);

    // Not fresh and nothing stored: kept, nothing to restore.
    assert_eq!(decision.action, SessionAction::KeepAndStartFresh);
    assert_eq!(decision.visible_section(), Section::Registration);
}

#[test]
fn questionnaire_without_identity_is_cleared_at_any_age() {
    for age in [0, 1_000, FRESHNESS_WINDOW_MS, FRESHNESS_WINDOW_MS + 1, i64::from(u32::MAX)] {
        let mut store = empty_store();
        store.save(&record(Section::Questionnaire));
        store.set_visit_timestamp(NOW - age);

        let decision = manager(NOW).decide_session_state(&mut store);

        assert_eq!(decision.action, SessionAction::ClearAll, "age {age}");
        assert_eq!(decision.visible_section(), Section::Registration);
        assert_eq!(store.load(), None);
        assert_eq!(store.visit_timestamp(), Some(NOW));
    }
}

#[test]
fn questionnaire_without_identity_and_no_timestamp_is_cleared() {
    let mut store = empty_store();
    store.save(&record(Section::Questionnaire));

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::ClearAll);
}

#[test]
fn half_identity_counts_as_missing() {
    let mut store = registered_store(Section::Questionnaire, 1_000);
    store.storage_mut().remove(USER_NICKNAME_KEY);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::ClearAll);
    assert!(store.storage().get(REGISTRATION_ID_KEY).is_none());
}

#[test]
fn results_without_identity_is_corrupted_on_reload() {
    let mut store = empty_store();
    store.save(&record(Section::Results));
    store.set_visit_timestamp(NOW - 1_000);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::ClearAll);
    assert_eq!(store.load(), None);
}

#[test]
fn results_resume_at_questionnaire() {
    let mut store = registered_store(Section::Results, 1_000);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(
        decision.action,
        SessionAction::KeepAndRestore(Section::Questionnaire)
    );
}

#[test]
fn questionnaire_without_number_falls_back_to_registration() {
    let mut store = registered_store(Section::Questionnaire, 1_000);
    let mut incomplete = record(Section::Questionnaire);
    incomplete.number.clear();
    store.save(&incomplete);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(
        decision.action,
        SessionAction::KeepAndRestore(Section::Registration)
    );
    assert_eq!(decision.restored, Some(incomplete));
}

#[test]
fn registration_section_restores_typed_fields_without_identity() {
    let mut store = empty_store();
    store.save(&record(Section::Registration));
    store.set_visit_timestamp(NOW - 1_000);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(
        decision.action,
        SessionAction::KeepAndRestore(Section::Registration)
    );
    assert_eq!(decision.restored.unwrap().nickname, "Ana");
}

#[test]
fn malformed_record_is_cleared() {
    let mut store = empty_store();
    store.storage_mut().set(FORM_DATA_KEY, "{\"nickname\": ");
    store.set_registration_identity("42", "Ana");
    store.set_visit_timestamp(NOW - 1_000);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::ClearAll);
    assert!(store.storage().get(FORM_DATA_KEY).is_none());
    assert_eq!(store.registration_identity(), None);
    assert_eq!(store.visit_timestamp(), Some(NOW));
}

#[test]
fn identity_only_is_kept_without_restoring() {
    let mut store = empty_store();
    store.set_registration_identity("42", "Ana");

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::KeepAndStartFresh);
    assert!(store.registration_identity().is_some());
}

#[test]
fn unparseable_timestamp_means_fresh_visit() {
    let mut store = empty_store();
    store.save(&record(Section::Questionnaire));
    store.storage_mut().set(LAST_VISIT_KEY, "NaN");

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::ClearAll);
    assert_eq!(store.visit_timestamp(), Some(NOW));
}

#[test]
fn extreme_timestamps_do_not_panic() {
    for stored in [i64::MIN, i64::MAX] {
        let mut store = empty_store();
        store.save(&record(Section::Questionnaire));
        store.set_registration_identity("42", "Ana");
        store.set_visit_timestamp(stored);

        let decision = manager(NOW).decide_session_state(&mut store);

        assert_eq!(
            decision.action,
            SessionAction::KeepAndRestore(Section::Questionnaire)
        );
        assert_eq!(store.visit_timestamp(), Some(NOW));
    }
}

#[test]
fn empty_form_data_keeps_identity_on_reload() {
    let mut store = empty_store();
    store.storage_mut().set(FORM_DATA_KEY, "");
    store.set_registration_identity("42", "Ana");
    store.set_visit_timestamp(NOW - 1_000);

    let decision = manager(NOW).decide_session_state(&mut store);

    assert_eq!(decision.action, SessionAction::KeepAndStartFresh);
    assert_eq!(decision.restored, None);
    assert_eq!(store.registration_id().as_deref(), Some("42"));
    assert_eq!(store.user_nickname().as_deref(), Some("Ana"));
}
