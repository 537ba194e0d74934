// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, bookmarks, questions, sessions, test_results},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Question delivery and session submission are open to guests.
/// * History, wrong-answer statistics and bookmarks extract the user from the token.
/// * Trace and CORS apply to everything.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let question_routes = Router::new()
        .route("/", get(questions::list_questions))
        .route("/real-test", get(questions::real_test_paper))
        .route("/check", post(questions::check_answer));

    let session_routes = Router::new().route("/submit", post(sessions::submit_session));

    // POST accepts guests, GET requires a token; both decided by the extractors.
    let result_routes = Router::new()
        .route(
            "/",
            post(test_results::create_test_result).get(test_results::list_test_results),
        )
        .route("/wrong-answers", get(test_results::wrong_answers));

    let bookmark_routes = Router::new().route(
        "/",
        get(bookmarks::list_bookmarks)
            .post(bookmarks::add_bookmark)
            .delete(bookmarks::remove_bookmark),
    );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/questions", question_routes)
        .nest("/sessions", session_routes)
        .nest("/test-results", result_routes)
        .nest("/bookmarks", bookmark_routes)
        .route("/results", get(test_results::show_summary));

    Router::new()
        .nest("/api", api_routes)
        // Outermost first: trace wraps CORS.
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
