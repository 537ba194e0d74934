// src/quiz/scoring.rs

use std::{collections::{BTreeMap, HashMap}, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    config::MARKS_PER_QUESTION,
    models::{question::Question, test_result::ProcessedAnswer},
};

/// Reduces the attempts on one question to its scored outcome.
///
/// The last attempt is final. Every attempt that is not the correct answer
/// counts towards `wrong_frequency`, not just the final one.
pub fn process_answer(question: &Question, attempts: &[String]) -> ProcessedAnswer {
    let user_answer = attempts.last().cloned().unwrap_or_default();

    let mut wrong_frequency = BTreeMap::new();
    for attempt in attempts.iter().filter(|a| **a != question.answer) {
        *wrong_frequency.entry(attempt.clone()).or_insert(0) += 1;
    }

    ProcessedAnswer {
        qid: question.qid.clone(),
        is_correct: user_answer == question.answer,
        user_answer,
        wrong_frequency,
        correct_answer: question.answer.clone(),
        time_spent: 0,
    }
}

/// Outcome of a whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub answers: Vec<ProcessedAnswer>,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    /// Rounded percentage, 0..=100.
    pub score: u32,
}

/// Scores every presented question, in presentation order. Unattempted
/// questions count as wrong.
pub fn score_session(questions: &[Question], attempts: &HashMap<String, Vec<String>>) -> ScoreCard {
    let answers: Vec<ProcessedAnswer> = questions
        .iter()
        .map(|q| {
            let tried = attempts.get(&q.qid).map(Vec::as_slice).unwrap_or(&[]);
            process_answer(q, tried)
        })
        .collect();

    let total_questions = answers.len() as u32;
    let correct_answers = answers.iter().filter(|a| a.is_correct).count() as u32;

    ScoreCard {
        total_questions,
        correct_answers,
        wrong_answers: total_questions - correct_answers,
        score: percentage(correct_answers, total_questions),
        answers,
    }
}

/// `round(correct / total * 100)`, half up. An empty session scores 0.
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (correct, total) = (u64::from(correct), u64::from(total));
    ((200 * correct + total) / (2 * total)) as u32
}

/// Letter grade of a normalized real-test score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            40..=49 => Grade::E,
            _ => Grade::F,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Real-test marks and the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealTestScore {
    pub marks_scored: u32,
    pub total_marks: u32,
    pub normalized_score: u32,
    pub grade: Grade,
}

/// The test counts for 75% of the normalized score; the assignment share
/// (25%) is assumed to be full marks.
///
/// `round((marks / total * 0.75 + 0.25) * 100)` is evaluated on integers as
/// `25 + round(75 * marks / total)`, rounding half up.
pub fn real_test_score(correct: u32, total: u32) -> RealTestScore {
    let marks_scored = correct * MARKS_PER_QUESTION;
    let total_marks = total * MARKS_PER_QUESTION;

    let test_share = if total_marks == 0 {
        0
    } else {
        let (marks, out_of) = (u64::from(marks_scored), u64::from(total_marks));
        ((150 * marks + out_of) / (2 * out_of)) as u32
    };
    let normalized_score = 25 + test_share;

    RealTestScore {
        marks_scored,
        total_marks,
        normalized_score,
        grade: Grade::from_score(normalized_score),
    }
}
