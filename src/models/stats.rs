// src/models/stats.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Cross-session wrong-answer statistics for one question.
/// Derived on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswerAggregate {
    pub qid: String,
    pub question: String,
    pub correct_answer: String,
    pub options: Vec<String>,

    /// Wrong option text -> times it was the final pick, in first-seen order.
    pub option_counts: IndexMap<String, u32>,

    pub total_wrong: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswersResponse {
    pub wrong_answers: Vec<WrongAnswerAggregate>,
}
