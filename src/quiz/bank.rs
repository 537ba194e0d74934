// src/quiz/bank.rs

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::models::question::{Question, Subject, WeekKey};

static QID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]_[A-Za-z0-9_.-]+$").expect("qid pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse question bank {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidWeek(#[from] crate::models::question::InvalidWeekKey),

    #[error("malformed qid '{0}'")]
    InvalidQid(String),

    #[error("question '{qid}' does not belong to {subject}")]
    SubjectMismatch { qid: String, subject: Subject },

    #[error("question '{0}' has fewer than two options")]
    TooFewOptions(String),

    #[error("answer of question '{0}' is not one of its options")]
    AnswerNotInOptions(String),

    #[error("duplicate qid '{0}'")]
    DuplicateQid(String),
}

/// The static question banks of every subject, grouped by week.
#[derive(Debug, Default)]
pub struct QuestionBank {
    subjects: HashMap<Subject, BTreeMap<WeekKey, Vec<Question>>>,
    /// qid -> (week, position) within its subject.
    index: HashMap<String, (WeekKey, usize)>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `<dir>/<subject-slug>.json` for every subject.
    ///
    /// Each file is a JSON object keyed by week (`"week1": [...]`). A missing
    /// file leaves that subject empty.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, BankError> {
        let mut bank = Self::new();

        for subject in Subject::ALL {
            let path = dir.as_ref().join(format!("{}.json", subject.slug()));
            if !path.exists() {
                tracing::warn!("No question bank for {} at {}", subject, path.display());
                continue;
            }

            let raw = std::fs::read_to_string(&path).map_err(|source| BankError::Io {
                path: path.clone(),
                source,
            })?;
            let weeks: BTreeMap<String, Vec<Question>> =
                serde_json::from_str(&raw).map_err(|source| BankError::Parse {
                    path: path.clone(),
                    source,
                })?;

            for (week, questions) in weeks {
                bank.insert_week(subject, week.parse()?, questions)?;
            }

            tracing::info!(
                "Loaded {} questions for {} from {}",
                bank.question_count(subject),
                subject,
                path.display()
            );
        }

        Ok(bank)
    }

    /// Validates and adds one week of questions. Adding to an existing week appends.
    pub fn insert_week(
        &mut self,
        subject: Subject,
        week: WeekKey,
        questions: Vec<Question>,
    ) -> Result<(), BankError> {
        let mut batch = HashSet::new();
        for question in &questions {
            validate_question(subject, question)?;
            if self.index.contains_key(&question.qid) || !batch.insert(question.qid.as_str()) {
                return Err(BankError::DuplicateQid(question.qid.clone()));
            }
        }

        let slot = self
            .subjects
            .entry(subject)
            .or_default()
            .entry(week)
            .or_default();

        for question in questions {
            self.index.insert(question.qid.clone(), (week, slot.len()));
            slot.push(question);
        }

        Ok(())
    }

    /// Week keys of a subject in numeric order.
    pub fn weeks(&self, subject: Subject) -> Vec<WeekKey> {
        self.subjects
            .get(&subject)
            .map(|weeks| weeks.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Questions of one week, empty when the week does not exist.
    pub fn week(&self, subject: Subject, week: WeekKey) -> &[Question] {
        self.subjects
            .get(&subject)
            .and_then(|weeks| weeks.get(&week))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every question of a subject, weeks in numeric order.
    pub fn all_questions(&self, subject: Subject) -> impl Iterator<Item = &Question> {
        self.subjects
            .get(&subject)
            .into_iter()
            .flat_map(|weeks| weeks.values().flatten())
    }

    pub fn question_count(&self, subject: Subject) -> usize {
        self.all_questions(subject).count()
    }

    /// Looks a question up by qid, picking the subject bank from the prefix.
    pub fn find(&self, qid: &str) -> Option<&Question> {
        let subject = Subject::from_qid(qid)?;
        let (week, position) = self.index.get(qid)?;
        self.week(subject, *week).get(*position)
    }
}

fn validate_question(subject: Subject, question: &Question) -> Result<(), BankError> {
    if !QID_PATTERN.is_match(&question.qid) {
        return Err(BankError::InvalidQid(question.qid.clone()));
    }
    if question.subject() != Some(subject) {
        return Err(BankError::SubjectMismatch {
            qid: question.qid.clone(),
            subject,
        });
    }
    if question.options.len() < 2 {
        return Err(BankError::TooFewOptions(question.qid.clone()));
    }
    if !question.options.contains(&question.answer) {
        return Err(BankError::AnswerNotInOptions(question.qid.clone()));
    }
    Ok(())
}
