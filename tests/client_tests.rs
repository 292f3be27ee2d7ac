// tests/client_tests.rs

use std::sync::Arc;

use vocab_quiz::{
    config::Config,
    models::submission::{QuestionnaireRequest, SubmittedAnswer},
    quiz::{QuestionId, QuizApiClient, QuizBackend, QuizError},
    routes,
    state::AppState,
    store::MemoryQuizStore,
};

async fn spawn_app(store: Arc<MemoryQuizStore>) -> String {
    let config = Config {
        database_url: "postgres://unused".to_string(),
        rust_log: "error".to_string(),
        port: 0,
        allowed_origins: Vec::new(),
    };
    let app = routes::create_router(AppState { store, config });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn q(n: u8) -> QuestionId {
    QuestionId::new(n).unwrap()
}

#[tokio::test]
async fn fetches_and_groups_answer_key() {
    let store = Arc::new(MemoryQuizStore::with_answer_key([
        (1, "server"),
        (2, "souvenir"),
        (2, "souvenier"),
    ]));
    let client = QuizApiClient::new(&spawn_app(store).await).unwrap();

    let key = client.fetch_answer_key().await.expect("answer key");

    assert_eq!(key.accepted(q(1)), ["server"]);
    assert_eq!(key.accepted(q(2)), ["souvenir", "souvenier"]);
    assert!(key.accepted(q(3)).is_empty());
}

#[tokio::test]
async fn server_failure_is_fetch_failed() {
    let store = Arc::new(MemoryQuizStore::with_answer_key([(1, "server")]));
    store.set_unavailable(true);
    let client = QuizApiClient::new(&spawn_app(store).await).unwrap();

    let err = client.fetch_answer_key().await.unwrap_err();

    assert_eq!(
        err,
        QuizError::FetchFailed {
            status: Some(500),
            message: "Internal server error".to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_server_is_fetch_failed() {
    // Bind then drop a listener so the port is very likely closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = QuizApiClient::new(&format!("http://127.0.0.1:{}", port)).unwrap();
    let err = client.fetch_answer_key().await.unwrap_err();

    assert!(matches!(err, QuizError::FetchFailed { status: None, .. }));
}

#[tokio::test]
async fn registers_and_submits() {
    let store = Arc::new(MemoryQuizStore::with_answer_key([(1, "server")]));
    let client = QuizApiClient::new(&spawn_app(store.clone()).await).unwrap();

    let id = client.register("Ana", "7").await.expect("registration");
    assert_eq!(id, "1");

    client
        .submit_questionnaire(&QuestionnaireRequest {
            registration_id: id,
            answers: vec![SubmittedAnswer {
                question: "Question 1".to_string(),
                answer: "server".to_string(),
            }],
            score: 1,
        })
        .await
        .expect("submission");

    assert_eq!(store.submissions().await.len(), 1);
}

#[tokio::test]
async fn rejected_submission_carries_server_message() {
    let store = Arc::new(MemoryQuizStore::new());
    let client = QuizApiClient::new(&spawn_app(store).await).unwrap();

    let err = client
        .submit_questionnaire(&QuestionnaireRequest {
            registration_id: "99".to_string(),
            answers: vec![SubmittedAnswer {
                question: "Question 1".to_string(),
                answer: "server".to_string(),
            }],
            score: 0,
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        QuizError::SubmissionFailed("Registration 99 not found".to_string())
    );
}
