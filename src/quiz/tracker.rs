// src/quiz/tracker.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// How answers are revealed during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Correctness is revealed after every selection; no completeness gate.
    Study,
    /// Nothing is revealed until the single global submit.
    #[default]
    Exam,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("session has already been submitted")]
    AlreadySubmitted,

    #[error("question '{0}' is not part of this session")]
    UnknownQuestion(String),

    #[error("'{option}' is not an option of question '{qid}'")]
    UnknownOption { qid: String, option: String },

    #[error("{} question(s) have not been answered", .missing.len())]
    Incomplete { missing: Vec<String> },
}

/// What the user sees right after selecting an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Exam mode: the attempt is logged silently.
    Recorded,
    /// Study mode: correctness is shown immediately.
    Revealed {
        is_correct: bool,
        correct_answer: String,
    },
}

#[derive(Debug)]
struct Slot {
    options: Vec<String>,
    answer: String,
    attempts: Vec<String>,
}

/// Per-session log of every option selection, grouped by question.
///
/// Attempts are appended even when they repeat an earlier pick, so the
/// scoring engine can tell how often a user settled on a wrong option.
#[derive(Debug)]
pub struct AttemptTracker {
    mode: SessionMode,
    order: Vec<String>,
    slots: HashMap<String, Slot>,
    submitted: bool,
}

impl AttemptTracker {
    /// Starts a session over the presented questions.
    pub fn new(mode: SessionMode, questions: &[Question]) -> Self {
        let order = questions.iter().map(|q| q.qid.clone()).collect();
        let slots = questions
            .iter()
            .map(|q| {
                (
                    q.qid.clone(),
                    Slot {
                        options: q.options.clone(),
                        answer: q.answer.clone(),
                        attempts: Vec::new(),
                    },
                )
            })
            .collect();

        Self {
            mode,
            order,
            slots,
            submitted: false,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Logs one selection.
    pub fn record(&mut self, qid: &str, option: &str) -> Result<Feedback, TrackerError> {
        if self.submitted {
            return Err(TrackerError::AlreadySubmitted);
        }

        let slot = self
            .slots
            .get_mut(qid)
            .ok_or_else(|| TrackerError::UnknownQuestion(qid.to_string()))?;

        if !slot.options.iter().any(|o| o == option) {
            return Err(TrackerError::UnknownOption {
                qid: qid.to_string(),
                option: option.to_string(),
            });
        }

        slot.attempts.push(option.to_string());

        Ok(match self.mode {
            SessionMode::Exam => Feedback::Recorded,
            SessionMode::Study => Feedback::Revealed {
                is_correct: option == slot.answer,
                correct_answer: slot.answer.clone(),
            },
        })
    }

    /// Every selection made on a question, oldest first.
    pub fn attempts(&self, qid: &str) -> &[String] {
        self.slots
            .get(qid)
            .map(|slot| slot.attempts.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_answered(&self, qid: &str) -> bool {
        !self.attempts(qid).is_empty()
    }

    /// The selection that counts for scoring.
    pub fn final_answer(&self, qid: &str) -> Option<&str> {
        self.attempts(qid).last().map(String::as_str)
    }

    /// Qids without any attempt, in presentation order.
    pub fn unanswered(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|qid| !self.is_answered(qid))
            .cloned()
            .collect()
    }

    /// Closes the session. Exam sessions require an attempt on every question
    /// unless the clock ran out.
    pub fn submit(&mut self, timed_out: bool) -> Result<(), TrackerError> {
        if self.submitted {
            return Err(TrackerError::AlreadySubmitted);
        }

        if self.mode == SessionMode::Exam && !timed_out {
            let missing = self.unanswered();
            if !missing.is_empty() {
                return Err(TrackerError::Incomplete { missing });
            }
        }

        self.submitted = true;
        Ok(())
    }

    /// The raw attempt lists keyed by qid, for the scoring engine.
    pub fn attempt_map(&self) -> HashMap<String, Vec<String>> {
        self.slots
            .iter()
            .filter(|(_, slot)| !slot.attempts.is_empty())
            .map(|(qid, slot)| (qid.clone(), slot.attempts.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        ["p_1", "p_2"]
            .iter()
            .map(|qid| Question {
                qid: qid.to_string(),
                question: "?".to_string(),
                options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                answer: "A".to_string(),
            })
            .collect()
    }

    #[test]
    fn attempts_are_appended_including_repeats() {
        let mut tracker = AttemptTracker::new(SessionMode::Exam, &questions());
        assert!(!tracker.is_answered("p_1"));

        tracker.record("p_1", "B").unwrap();
        tracker.record("p_1", "B").unwrap();
        tracker.record("p_1", "A").unwrap();

        assert_eq!(tracker.attempts("p_1"), ["B", "B", "A"]);
        assert_eq!(tracker.final_answer("p_1"), Some("A"));
        assert!(tracker.is_answered("p_1"));
        assert_eq!(tracker.final_answer("p_2"), None);
    }

    #[test]
    fn exam_mode_reveals_nothing() {
        let mut tracker = AttemptTracker::new(SessionMode::Exam, &questions());
        assert_eq!(tracker.record("p_1", "B").unwrap(), Feedback::Recorded);
    }

    #[test]
    fn study_mode_reveals_on_every_attempt() {
        let mut tracker = AttemptTracker::new(SessionMode::Study, &questions());
        assert_eq!(
            tracker.record("p_1", "B").unwrap(),
            Feedback::Revealed {
                is_correct: false,
                correct_answer: "A".to_string()
            }
        );
        assert!(tracker.is_answered("p_1"));

        // Re-attempts stay allowed and logged.
        assert_eq!(
            tracker.record("p_1", "A").unwrap(),
            Feedback::Revealed {
                is_correct: true,
                correct_answer: "A".to_string()
            }
        );
        assert_eq!(tracker.attempts("p_1").len(), 2);
    }

    #[test]
    fn exam_submit_requires_every_question() {
        let mut tracker = AttemptTracker::new(SessionMode::Exam, &questions());
        tracker.record("p_2", "C").unwrap();

        let err = tracker.submit(false).unwrap_err();
        assert_eq!(
            err,
            TrackerError::Incomplete {
                missing: vec!["p_1".to_string()]
            }
        );
        assert!(!tracker.is_submitted());

        tracker.record("p_1", "A").unwrap();
        tracker.submit(false).unwrap();
        assert!(tracker.is_submitted());
    }

    #[test]
    fn timed_out_exam_submits_incomplete() {
        let mut tracker = AttemptTracker::new(SessionMode::Exam, &questions());
        tracker.submit(true).unwrap();
        assert!(tracker.is_submitted());
    }

    #[test]
    fn study_submit_has_no_completeness_gate() {
        let mut tracker = AttemptTracker::new(SessionMode::Study, &questions());
        tracker.submit(false).unwrap();
    }

    #[test]
    fn submission_is_terminal() {
        let mut tracker = AttemptTracker::new(SessionMode::Study, &questions());
        tracker.record("p_1", "A").unwrap();
        tracker.submit(false).unwrap();

        assert_eq!(tracker.record("p_1", "B"), Err(TrackerError::AlreadySubmitted));
        assert_eq!(tracker.submit(false), Err(TrackerError::AlreadySubmitted));
        assert_eq!(tracker.attempts("p_1"), ["A"]);
    }

    #[test]
    fn rejects_unknown_questions_and_options() {
        let mut tracker = AttemptTracker::new(SessionMode::Exam, &questions());
        assert!(matches!(
            tracker.record("p_9", "A"),
            Err(TrackerError::UnknownQuestion(_))
        ));
        assert!(matches!(
            tracker.record("p_1", "Z"),
            Err(TrackerError::UnknownOption { .. })
        ));
        assert!(!tracker.is_answered("p_1"));
    }

    #[test]
    fn attempt_map_only_holds_answered_questions() {
        let mut tracker = AttemptTracker::new(SessionMode::Exam, &questions());
        tracker.record("p_1", "C").unwrap();
        let map = tracker.attempt_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["p_1"], vec!["C".to_string()]);
    }
}
