// src/handlers/questions.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    config::{MARKS_PER_QUESTION, REAL_TEST_DURATION_SECS},
    error::AppError,
    models::question::{CategoryQuery, CheckAnswerRequest, CheckAnswerResponse, QuestionQuery, Subject},
    quiz::{
        bank::QuestionBank,
        source::{self, Randomization, WeekSelection},
    },
};

/// Lists the questions of a category according to the test settings,
/// or its week keys when `getWeeks=true`.
///
/// Weeks that do not exist simply contribute no questions.
pub async fn list_questions(
    State(bank): State<Arc<QuestionBank>>,
    Query(params): Query<QuestionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let subject: Subject = params.category.parse()?;

    if params.get_weeks {
        let weeks: Vec<String> = bank.weeks(subject).iter().map(|w| w.to_string()).collect();
        return Ok(Json(json!({ "weeks": weeks })));
    }

    let selection = WeekSelection::from_params(
        params.week.as_deref(),
        params.weeks.as_deref(),
        params.shuffle_weeks,
    );
    let randomization = Randomization {
        shuffle_questions: params.shuffle_questions,
        shuffle_options: params.shuffle_options,
    };

    let questions = source::select_questions(&bank, subject, &selection, randomization);
    tracing::debug!(
        "Serving {} {} questions for {:?}",
        questions.len(),
        subject,
        selection
    );

    Ok(Json(json!({ "questions": questions })))
}

/// Generates a real-test paper for a category.
pub async fn real_test_paper(
    State(bank): State<Arc<QuestionBank>>,
    Query(params): Query<CategoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let subject: Subject = params.category.parse()?;
    let questions = source::real_test_paper(&bank, subject);

    if questions.is_empty() {
        return Err(AppError::NotFound(format!("No questions available for {}", subject)));
    }

    Ok(Json(json!({
        "questions": questions,
        "timeLimitSecs": REAL_TEST_DURATION_SECS,
        "marksPerQuestion": MARKS_PER_QUESTION,
    })))
}

/// Study-mode reveal of a single selection.
pub async fn check_answer(
    State(bank): State<Arc<QuestionBank>>,
    Json(payload): Json<CheckAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = bank
        .find(&payload.qid)
        .ok_or_else(|| AppError::NotFound(format!("Question '{}' not found", payload.qid)))?;

    if !question.options.contains(&payload.option) {
        return Err(AppError::BadRequest(format!(
            "'{}' is not an option of question '{}'",
            payload.option, payload.qid
        )));
    }

    Ok(Json(CheckAnswerResponse {
        qid: question.qid.clone(),
        is_correct: payload.option == question.answer,
        correct_answer: question.answer.clone(),
    }))
}
