// src/quiz/transport.rs

use url::form_urlencoded;

use crate::{
    models::test_result::{TestSummary, TestResult},
    quiz::{scoring::RealTestScore, tracker::SessionMode},
    utils::jwt::Viewer,
};

/// Query parameter that carries the encoded summary.
pub const SUMMARY_PARAM: &str = "data";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("missing 'data' query parameter")]
    MissingSummary,

    #[error("invalid summary payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Appends the JSON-encoded summary to the results page path, so the page can
/// render the headline numbers without another round trip.
pub fn results_url(results_page_path: &str, summary: &TestSummary) -> Result<String, TransportError> {
    let payload = serde_json::to_string(summary)?;
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(SUMMARY_PARAM, &payload)
        .finish();

    let separator = if results_page_path.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}{}", results_page_path, separator, query))
}

/// Reads the summary back out of a results-page query string.
pub fn decode_summary(query: &str) -> Result<TestSummary, TransportError> {
    let (_, payload) = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == SUMMARY_PARAM)
        .ok_or(TransportError::MissingSummary)?;
    Ok(serde_json::from_str(&payload)?)
}

/// Full answer detail is only stored for signed-in users finishing an exam.
/// Guests and study sessions only get the summary.
pub fn should_persist(viewer: &Viewer, mode: SessionMode) -> bool {
    !viewer.is_guest() && mode == SessionMode::Exam
}

pub fn summary_of(result: &TestResult) -> TestSummary {
    TestSummary {
        score: result.score.max(0) as u32,
        total_questions: result.total_questions.max(0) as u32,
        correct_answers: result.correct_answers.max(0) as u32,
        wrong_answers: result.wrong_answers.max(0) as u32,
        time_taken: result.time_taken.max(0) as u64,
        category: result.category.clone(),
        normalized_score: result.normalized_score.map(|n| n.max(0) as u32),
        grade: result.grade.clone(),
    }
}

/// Adds the real-test fields to a plain summary.
pub fn with_real_test(mut summary: TestSummary, real: &RealTestScore) -> TestSummary {
    summary.normalized_score = Some(real.normalized_score);
    summary.grade = Some(real.grade.to_string());
    summary
}
