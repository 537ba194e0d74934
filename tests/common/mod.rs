// tests/common/mod.rs

use std::sync::Arc;

use mooc_quiz::{
    config::Config,
    models::question::{Question, Subject, WeekKey},
    quiz::bank::QuestionBank,
    repository::Repositories,
    routes,
    state::AppState,
};
use serde_json::{Value, json};

fn question(qid: &str, answer: &str) -> Question {
    Question {
        qid: qid.to_string(),
        question: format!("Question {}", qid),
        options: vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()],
        answer: answer.to_string(),
    }
}

/// psychology: week0 [p_0_1], week1 [p_1_1, p_1_2], week2 [p_2_1];
/// conservation-economics: week1 [c_1_1]; sustainable-development is empty.
fn test_bank() -> QuestionBank {
    let mut bank = QuestionBank::new();
    bank.insert_week(Subject::Psychology, WeekKey(0), vec![question("p_0_1", "A")])
        .unwrap();
    bank.insert_week(
        Subject::Psychology,
        WeekKey(1),
        vec![question("p_1_1", "A"), question("p_1_2", "B")],
    )
    .unwrap();
    bank.insert_week(Subject::Psychology, WeekKey(2), vec![question("p_2_1", "C")])
        .unwrap();
    bank.insert_week(
        Subject::ConservationEconomics,
        WeekKey(1),
        vec![question("c_1_1", "D")],
    )
    .unwrap();
    bank
}

/// Spawns the app on a random port, backed by the in-memory store.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app() -> String {
    let config = Config {
        database_url: None,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        question_bank_dir: "unused".to_string(),
        results_page_path: "/results".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
    };

    let state = AppState {
        config,
        bank: Arc::new(test_bank()),
        repos: Repositories::in_memory(),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a fresh user and returns its bearer token.
pub async fn login_token(address: &str, client: &reqwest::Client) -> String {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let credentials = json!({ "username": username, "password": "password123" });

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&credentials)
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(response.status().as_u16(), 201);

    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&credentials)
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    body["token"].as_str().expect("token in login response").to_string()
}
