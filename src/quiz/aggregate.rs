// src/quiz/aggregate.rs

use indexmap::IndexMap;

use crate::{
    models::{stats::WrongAnswerAggregate, test_result::TestResult},
    quiz::bank::QuestionBank,
};

/// Groups every wrong final answer across `results` by qid.
///
/// `results` are expected most-recent-first; groups keep the order in which
/// they were first encountered, so ties in `total_wrong` stay in that order.
/// Unanswered questions are not wrong picks and are skipped, as are qids the
/// banks no longer know.
pub fn aggregate_wrong_answers(
    results: &[TestResult],
    bank: &QuestionBank,
) -> Vec<WrongAnswerAggregate> {
    let mut groups: IndexMap<String, WrongAnswerAggregate> = IndexMap::new();

    let wrong_answers = results
        .iter()
        .flat_map(|result| result.answers.iter())
        .filter(|answer| !answer.is_correct && !answer.user_answer.is_empty());

    for answer in wrong_answers {
        if !groups.contains_key(&answer.qid) {
            let Some(question) = bank.find(&answer.qid) else {
                tracing::debug!("Skipping wrong answer for unknown qid {}", answer.qid);
                continue;
            };
            groups.insert(
                answer.qid.clone(),
                WrongAnswerAggregate {
                    qid: question.qid.clone(),
                    question: question.question.clone(),
                    correct_answer: question.answer.clone(),
                    options: question.options.clone(),
                    option_counts: IndexMap::new(),
                    total_wrong: 0,
                },
            );
        }

        if let Some(group) = groups.get_mut(&answer.qid) {
            *group
                .option_counts
                .entry(answer.user_answer.clone())
                .or_insert(0) += 1;
            group.total_wrong += 1;
        }
    }

    let mut aggregates: Vec<WrongAnswerAggregate> = groups.into_values().collect();
    // `sort_by` is stable.
    aggregates.sort_by(|a, b| b.total_wrong.cmp(&a.total_wrong));
    aggregates
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sqlx::types::Json;
    use uuid::Uuid;

    use super::*;
    use crate::models::{
        question::{Question, Subject, WeekKey},
        test_result::ProcessedAnswer,
    };

    fn bank() -> QuestionBank {
        let mut bank = QuestionBank::new();
        let questions = ["p_7", "p_8", "p_9"]
            .iter()
            .map(|qid| Question {
                qid: qid.to_string(),
                question: format!("Question {}", qid),
                options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                answer: "A".to_string(),
            })
            .collect();
        bank.insert_week(Subject::Psychology, WeekKey(1), questions).unwrap();
        bank
    }

    fn answer(qid: &str, picked: &str) -> ProcessedAnswer {
        ProcessedAnswer {
            qid: qid.to_string(),
            user_answer: picked.to_string(),
            is_correct: picked == "A",
            wrong_frequency: BTreeMap::new(),
            correct_answer: "A".to_string(),
            time_spent: 0,
        }
    }

    fn result(answers: Vec<ProcessedAnswer>) -> TestResult {
        let total = answers.len() as i32;
        let correct = answers.iter().filter(|a| a.is_correct).count() as i32;
        TestResult {
            id: Uuid::new_v4(),
            user_id: Some(1),
            is_guest: false,
            category: "psychology".to_string(),
            score: 0,
            total_questions: total,
            correct_answers: correct,
            wrong_answers: total - correct,
            time_taken: 10,
            answers: Json(answers),
            normalized_score: None,
            grade: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn repeated_wrong_pick_is_counted_across_results() {
        let results = vec![
            result(vec![answer("p_7", "C"), answer("p_8", "A")]),
            result(vec![answer("p_7", "C"), answer("p_8", "B")]),
        ];

        let aggregates = aggregate_wrong_answers(&results, &bank());
        assert_eq!(aggregates.len(), 2);

        let first = &aggregates[0];
        assert_eq!(first.qid, "p_7");
        assert_eq!(first.option_counts["C"], 2);
        assert_eq!(first.total_wrong, 2);
        assert_eq!(first.correct_answer, "A");
        assert_eq!(first.question, "Question p_7");

        assert_eq!(aggregates[1].qid, "p_8");
        assert_eq!(aggregates[1].total_wrong, 1);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let results = vec![result(vec![
            answer("p_9", "B"),
            answer("p_7", "C"),
            answer("p_8", "B"),
        ])];
        let qids: Vec<String> = aggregate_wrong_answers(&results, &bank())
            .into_iter()
            .map(|a| a.qid)
            .collect();
        assert_eq!(qids, vec!["p_9", "p_7", "p_8"]);
    }

    #[test]
    fn option_counts_sum_to_total_wrong() {
        let results = vec![
            result(vec![answer("p_7", "B")]),
            result(vec![answer("p_7", "C")]),
            result(vec![answer("p_7", "B")]),
        ];
        let aggregates = aggregate_wrong_answers(&results, &bank());
        let group = &aggregates[0];
        assert_eq!(group.option_counts.values().sum::<u32>(), group.total_wrong);
        assert_eq!(group.option_counts.keys().collect::<Vec<_>>(), vec!["B", "C"]);
    }

    #[test]
    fn skips_unanswered_and_unknown_questions() {
        let results = vec![result(vec![answer("p_7", ""), answer("p_404", "B")])];
        assert!(aggregate_wrong_answers(&results, &bank()).is_empty());
    }

    #[test]
    fn correct_answers_do_not_contribute() {
        let results = vec![result(vec![answer("p_7", "A")])];
        assert!(aggregate_wrong_answers(&results, &bank()).is_empty());
    }
}
