// src/models/test_result.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::quiz::{scoring::percentage, tracker::SessionMode};

/// The scored outcome of one question in a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedAnswer {
    pub qid: String,

    /// Final selection, empty when the question was never attempted.
    pub user_answer: String,

    pub is_correct: bool,

    /// Number of attempts that picked each wrong option.
    /// Never contains the correct answer.
    #[serde(default)]
    pub wrong_frequency: BTreeMap<String, u32>,

    pub correct_answer: String,

    /// Seconds spent on the question. Not tracked per question yet, always 0.
    #[serde(default)]
    pub time_spent: u32,
}

/// Represents the 'test_results' table. Rows are append-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: Uuid,
    pub user_id: Option<i64>,
    pub is_guest: bool,
    pub category: String,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub wrong_answers: i32,
    pub time_taken: i64,

    /// Stored as a JSONB array.
    pub answers: Json<Vec<ProcessedAnswer>>,

    /// Only set for real-test results.
    pub normalized_score: Option<i32>,
    pub grade: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Headline numbers carried to the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub time_taken: u64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

/// DTO for storing an already scored result (`POST /api/test-results`).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestResultRequest {
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(custom(function = validate_processed_answers))]
    pub answers: Vec<ProcessedAnswer>,
    #[validate(range(min = 0))]
    pub time_taken: i64,
    #[validate(range(min = 0, max = 100))]
    pub score: i32,
    #[validate(range(min = 1))]
    pub total_questions: i32,
    #[validate(range(min = 0))]
    pub correct_answers: i32,
    #[validate(range(min = 0))]
    pub wrong_answers: i32,
}

impl CreateTestResultRequest {
    /// Describes how the headline numbers contradict each other, if they do.
    ///
    /// * `correctAnswers + wrongAnswers == totalQuestions`
    /// * `score` is the rounded percentage of those counts
    /// * a non-empty `answers` list has one entry per question and agrees on
    ///   the number of correct answers (an empty list stores the summary only)
    pub fn inconsistency(&self) -> Option<&'static str> {
        if self.correct_answers.checked_add(self.wrong_answers) != Some(self.total_questions) {
            return Some("correctAnswers + wrongAnswers must equal totalQuestions");
        }

        let correct = u32::try_from(self.correct_answers).unwrap_or_default();
        let total = u32::try_from(self.total_questions).unwrap_or_default();
        if u32::try_from(self.score).ok() != Some(percentage(correct, total)) {
            return Some("score does not match correctAnswers / totalQuestions");
        }

        if !self.answers.is_empty() {
            if self.answers.len() != total as usize {
                return Some("answers must list every question");
            }
            if self.answers.iter().filter(|a| a.is_correct).count() != correct as usize {
                return Some("answers disagree with correctAnswers");
            }
        }

        None
    }
}

fn validate_processed_answers(answers: &[ProcessedAnswer]) -> Result<(), ValidationError> {
    for answer in answers {
        if answer.is_correct != (answer.user_answer == answer.correct_answer) {
            return Err(ValidationError::new("inconsistent_correctness"));
        }
        if answer.wrong_frequency.contains_key(&answer.correct_answer) {
            return Err(ValidationError::new("correct_answer_in_wrong_frequency"));
        }
    }
    Ok(())
}

/// One option selection event, in the order the user made them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttemptEvent {
    pub qid: String,
    pub option: String,
}

/// DTO for submitting a whole session (`POST /api/sessions/submit`).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSessionRequest {
    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[serde(default)]
    pub mode: SessionMode,

    /// Scores with the weighted real-test scheme.
    #[serde(default)]
    pub real_test: bool,

    /// Qids in presentation order.
    #[validate(length(min = 1, max = 500))]
    pub question_ids: Vec<String>,

    #[validate(length(max = 10000))]
    #[serde(default)]
    pub attempts: Vec<AttemptEvent>,

    /// Seconds on the session clock.
    #[serde(default)]
    pub time_taken: u64,

    /// Countdown limit chosen in the test settings, if any.
    pub timer_limit_secs: Option<u64>,
}

/// Response for a submitted session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub summary: TestSummary,
    pub results_url: String,
    pub answers: Vec<ProcessedAnswer>,
    pub timed_out: bool,
    pub persisted: bool,
    pub test_result_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(total: i32, correct: i32, wrong: i32) -> CreateTestResultRequest {
        CreateTestResultRequest {
            category: "psychology".to_string(),
            answers: vec![],
            time_taken: 30,
            score: 50,
            total_questions: total,
            correct_answers: correct,
            wrong_answers: wrong,
        }
    }

    #[test]
    fn counts_must_sum_to_total() {
        assert!(request(4, 2, 2).validate().is_ok());
        assert_eq!(request(4, 2, 2).inconsistency(), None);
        assert!(request(4, 2, 1).inconsistency().is_some());
        assert!(request(0, 0, 0).validate().is_err());
    }

    #[test]
    fn overflowing_counts_are_inconsistent_not_a_panic() {
        let req = request(i32::MAX, i32::MAX, 1);
        assert_eq!(
            req.inconsistency(),
            Some("correctAnswers + wrongAnswers must equal totalQuestions")
        );
    }

    #[test]
    fn score_must_match_the_counts() {
        let mut req = request(4, 3, 1);
        req.score = 100;
        assert!(req.inconsistency().is_some());
        req.score = 75;
        assert_eq!(req.inconsistency(), None);
    }

    #[test]
    fn listed_answers_must_agree_with_the_counts() {
        let answer = |user: &str| ProcessedAnswer {
            qid: "p_1".to_string(),
            user_answer: user.to_string(),
            is_correct: user == "A",
            wrong_frequency: BTreeMap::new(),
            correct_answer: "A".to_string(),
            time_spent: 0,
        };

        let mut req = request(2, 1, 1);
        req.answers = vec![answer("A")];
        assert_eq!(req.inconsistency(), Some("answers must list every question"));

        req.answers = vec![answer("A"), answer("A")];
        assert_eq!(req.inconsistency(), Some("answers disagree with correctAnswers"));

        req.answers = vec![answer("A"), answer("B")];
        assert_eq!(req.inconsistency(), None);
    }

    #[test]
    fn answers_with_inconsistent_correctness_are_rejected() {
        let mut req = request(1, 1, 0);
        req.answers.push(ProcessedAnswer {
            qid: "p_1".to_string(),
            user_answer: "B".to_string(),
            is_correct: true,
            wrong_frequency: BTreeMap::new(),
            correct_answer: "A".to_string(),
            time_spent: 0,
        });
        assert!(req.validate().is_err());
    }

    #[test]
    fn wrong_frequency_may_not_count_the_correct_answer() {
        let mut req = request(1, 1, 0);
        req.answers.push(ProcessedAnswer {
            qid: "p_1".to_string(),
            user_answer: "A".to_string(),
            is_correct: true,
            wrong_frequency: BTreeMap::from([("A".to_string(), 1)]),
            correct_answer: "A".to_string(),
            time_spent: 0,
        });
        assert!(req.validate().is_err());
    }

    #[test]
    fn summary_omits_real_test_fields_when_absent() {
        let summary = TestSummary {
            score: 80,
            total_questions: 5,
            correct_answers: 4,
            wrong_answers: 1,
            time_taken: 42,
            category: "psychology".to_string(),
            normalized_score: None,
            grade: None,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("grade").is_none());
        assert_eq!(value["totalQuestions"], 5);
    }
}
