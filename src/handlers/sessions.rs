// src/handlers/sessions.rs

use std::{collections::HashSet, sync::Arc};

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::types::Json as JsonColumn;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{Config, REAL_TEST_DURATION_SECS},
    error::AppError,
    models::{
        question::{Question, Subject},
        test_result::{SessionOutcome, SubmitSessionRequest, TestResult, TestSummary},
    },
    quiz::{
        bank::QuestionBank,
        scoring,
        timer::{SessionTimer, TimerMode},
        tracker::{AttemptTracker, SessionMode},
        transport,
    },
    repository::Repositories,
    utils::jwt::Viewer,
};

/// Resolves the presented qids against the banks, in presentation order.
fn resolve_questions(
    bank: &QuestionBank,
    subject: Subject,
    qids: &[String],
) -> Result<Vec<Question>, AppError> {
    let mut seen = HashSet::new();
    qids.iter()
        .map(|qid| {
            if !seen.insert(qid.as_str()) {
                return Err(AppError::BadRequest(format!("Question '{}' listed twice", qid)));
            }
            let question = bank
                .find(qid)
                .ok_or_else(|| AppError::NotFound(format!("Question '{}' not found", qid)))?;
            if question.subject() != Some(subject) {
                return Err(AppError::BadRequest(format!(
                    "Question '{}' is not part of {}",
                    qid, subject
                )));
            }
            Ok(question.clone())
        })
        .collect()
}

/// Session clocks are stored in a BIGINT column.
fn seconds_column(secs: u64) -> Result<i64, AppError> {
    i64::try_from(secs)
        .map_err(|_| AppError::BadRequest(format!("timeTaken {} is out of range", secs)))
}

/// Submits a finished session.
///
/// * Replays the attempt log through the tracker (exam sessions must answer
///   every question unless the clock ran out).
/// * Scores the session, adding the weighted score for real tests.
/// * Returns the processed answers and a results URL carrying the summary.
/// * Signed-in exam sessions are persisted in the background; a failed write
///   is logged and does not affect the response.
pub async fn submit_session(
    State(bank): State<Arc<QuestionBank>>,
    State(repos): State<Repositories>,
    State(config): State<Config>,
    viewer: Viewer,
    Json(req): Json<SubmitSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let subject: Subject = req.category.parse()?;
    seconds_column(req.time_taken)?;

    if req.real_test && req.mode == SessionMode::Study {
        return Err(AppError::BadRequest("Real tests run in exam mode".to_string()));
    }

    let questions = resolve_questions(&bank, subject, &req.question_ids)?;

    let limit = if req.real_test {
        Some(REAL_TEST_DURATION_SECS)
    } else {
        req.timer_limit_secs
    };
    let mut timer = SessionTimer::new(TimerMode::from_limit(limit));
    timer.advance(req.time_taken);

    let mut tracker = AttemptTracker::new(req.mode, &questions);
    for event in &req.attempts {
        tracker.record(&event.qid, &event.option)?;
    }
    tracker.submit(timer.is_expired())?;

    let card = scoring::score_session(&questions, &tracker.attempt_map());
    let real = req
        .real_test
        .then(|| scoring::real_test_score(card.correct_answers, card.total_questions));

    let mut summary = TestSummary {
        score: card.score,
        total_questions: card.total_questions,
        correct_answers: card.correct_answers,
        wrong_answers: card.wrong_answers,
        time_taken: timer.elapsed(),
        category: subject.slug().to_string(),
        normalized_score: None,
        grade: None,
    };
    if let Some(real) = &real {
        summary = transport::with_real_test(summary, real);
    }
    let results_url = transport::results_url(&config.results_page_path, &summary)?;

    let test_result_id = if transport::should_persist(&viewer, req.mode) {
        let result = TestResult {
            id: Uuid::new_v4(),
            user_id: viewer.user_id(),
            is_guest: false,
            category: summary.category.clone(),
            score: summary.score as i32,
            total_questions: summary.total_questions as i32,
            correct_answers: summary.correct_answers as i32,
            wrong_answers: summary.wrong_answers as i32,
            time_taken: seconds_column(summary.time_taken)?,
            answers: JsonColumn(card.answers.clone()),
            normalized_score: summary.normalized_score.map(|n| n as i32),
            grade: summary.grade.clone(),
            created_at: chrono::Utc::now(),
        };
        let id = result.id;

        let results = repos.results.clone();
        tokio::spawn(async move {
            if let Err(e) = results.insert(&result).await {
                tracing::error!("Failed to persist test result {}: {:?}", result.id, e);
            }
        });

        Some(id)
    } else {
        None
    };

    tracing::info!(
        "Session submitted: category={} mode={:?} score={} timed_out={} persisted={}",
        summary.category,
        req.mode,
        summary.score,
        timer.is_expired(),
        test_result_id.is_some()
    );

    Ok(Json(SessionOutcome {
        summary,
        results_url,
        answers: card.answers,
        timed_out: timer.is_expired(),
        persisted: test_result_id.is_some(),
        test_result_id,
    }))
}
