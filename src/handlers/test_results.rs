// src/handlers/test_results.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::types::Json as JsonColumn;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{Config, RESULT_HISTORY_LIMIT},
    error::AppError,
    models::{
        question::Subject,
        stats::WrongAnswersResponse,
        test_result::{CreateTestResultRequest, TestResult},
    },
    quiz::{aggregate, bank::QuestionBank, transport},
    repository::Repositories,
    utils::jwt::{AuthUser, Viewer},
};

/// Stores an already scored result.
///
/// Guests may store results too; they are kept without a user id.
pub async fn create_test_result(
    State(repos): State<Repositories>,
    State(config): State<Config>,
    viewer: Viewer,
    Json(payload): Json<CreateTestResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if let Some(reason) = payload.inconsistency() {
        return Err(AppError::BadRequest(reason.to_string()));
    }
    let subject: Subject = payload.category.parse()?;

    let result = TestResult {
        id: Uuid::new_v4(),
        user_id: viewer.user_id(),
        is_guest: viewer.is_guest(),
        category: subject.slug().to_string(),
        score: payload.score,
        total_questions: payload.total_questions,
        correct_answers: payload.correct_answers,
        wrong_answers: payload.wrong_answers,
        time_taken: payload.time_taken,
        answers: JsonColumn(payload.answers),
        normalized_score: None,
        grade: None,
        created_at: chrono::Utc::now(),
    };

    repos.results.insert(&result).await?;

    let results_url =
        transport::results_url(&config.results_page_path, &transport::summary_of(&result))?;

    tracing::info!(
        "Stored test result {} (guest: {})",
        result.id,
        result.is_guest
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "testResultId": result.id,
            "resultsUrl": results_url,
        })),
    ))
}

/// The signed-in user's most recent results.
pub async fn list_test_results(
    State(repos): State<Repositories>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let results = repos
        .results
        .recent_for_user(user.id, RESULT_HISTORY_LIMIT)
        .await?;

    Ok(Json(json!({ "results": results })))
}

/// Wrong-answer statistics over the user's recent history.
pub async fn wrong_answers(
    State(repos): State<Repositories>,
    State(bank): State<Arc<QuestionBank>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let results = repos
        .results
        .recent_for_user(user.id, RESULT_HISTORY_LIMIT)
        .await?;

    Ok(Json(WrongAnswersResponse {
        wrong_answers: aggregate::aggregate_wrong_answers(&results, &bank),
    }))
}

/// Decodes the summary carried in a results URL.
pub async fn show_summary(RawQuery(query): RawQuery) -> Result<impl IntoResponse, AppError> {
    let summary = transport::decode_summary(query.as_deref().unwrap_or_default())?;
    Ok(Json(summary))
}
