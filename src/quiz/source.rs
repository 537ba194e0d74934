// src/quiz/source.rs

use rand::Rng;

use crate::{
    config::REAL_TEST_QUESTION_COUNT,
    models::question::{DisplayQuestion, Question, Subject, WeekKey},
    quiz::{bank::QuestionBank, shuffle::shuffle_with},
};

/// Which weeks of a subject a session draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekSelection {
    /// Every week, flattened and shuffled.
    ShuffleAll,
    /// The listed weeks, in request order.
    Weeks(Vec<WeekKey>),
    /// A single week as stored.
    Single(WeekKey),
    /// No selector given: `week1`.
    Default,
}

impl WeekSelection {
    /// Resolves the query-string selectors in priority order:
    /// `shuffleWeeks`, then `weeks`, then `week`.
    ///
    /// Keys that do not parse select nothing rather than failing the request.
    pub fn from_params(week: Option<&str>, weeks: Option<&str>, shuffle_weeks: bool) -> Self {
        if shuffle_weeks {
            return WeekSelection::ShuffleAll;
        }

        if let Some(list) = weeks {
            let keys = list
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .filter_map(|key| key.parse().ok())
                .collect();
            return WeekSelection::Weeks(keys);
        }

        match week {
            Some(key) => match key.parse() {
                Ok(key) => WeekSelection::Single(key),
                Err(_) => WeekSelection::Weeks(Vec::new()),
            },
            None => WeekSelection::Default,
        }
    }
}

/// Presentation settings applied after week selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Randomization {
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
}

/// Returns the questions of `subject` selected by `selection`, stamped with display ids.
pub fn select_questions(
    bank: &QuestionBank,
    subject: Subject,
    selection: &WeekSelection,
    randomization: Randomization,
) -> Vec<DisplayQuestion> {
    select_questions_with(bank, subject, selection, randomization, &mut rand::rng())
}

pub fn select_questions_with<R: Rng + ?Sized>(
    bank: &QuestionBank,
    subject: Subject,
    selection: &WeekSelection,
    randomization: Randomization,
    rng: &mut R,
) -> Vec<DisplayQuestion> {
    let mut questions: Vec<Question> = match selection {
        WeekSelection::ShuffleAll => {
            let all = bank.all_questions(subject).cloned().collect();
            shuffle_with(all, rng)
        }
        WeekSelection::Weeks(weeks) => weeks
            .iter()
            .flat_map(|week| bank.week(subject, *week))
            .cloned()
            .collect(),
        WeekSelection::Single(week) => bank.week(subject, *week).to_vec(),
        WeekSelection::Default => bank.week(subject, WeekKey::DEFAULT).to_vec(),
    };

    if randomization.shuffle_questions {
        questions = shuffle_with(questions, rng);
    }

    if randomization.shuffle_options {
        for question in &mut questions {
            let options = std::mem::take(&mut question.options);
            question.options = shuffle_with(options, rng);
        }
    }

    stamp(subject, questions)
}

/// A real-test paper: the whole subject shuffled and cut to the paper length.
pub fn real_test_paper(bank: &QuestionBank, subject: Subject) -> Vec<DisplayQuestion> {
    let all = bank.all_questions(subject).cloned().collect();
    let mut questions = shuffle_with(all, &mut rand::rng());
    questions.truncate(REAL_TEST_QUESTION_COUNT);
    stamp(subject, questions)
}

fn stamp(subject: Subject, questions: Vec<Question>) -> Vec<DisplayQuestion> {
    questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| DisplayQuestion {
            display_id: format!("{}_{}", subject.slug(), index),
            question,
        })
        .collect()
}
