// src/models/question.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Course subject. Every qid carries the subject's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subject {
    Psychology,
    ConservationEconomics,
    SustainableDevelopment,
}

impl Subject {
    pub const ALL: [Subject; 3] = [
        Subject::Psychology,
        Subject::ConservationEconomics,
        Subject::SustainableDevelopment,
    ];

    /// The qid namespace, e.g. `p_` for psychology.
    pub fn prefix(self) -> &'static str {
        match self {
            Subject::Psychology => "p_",
            Subject::ConservationEconomics => "c_",
            Subject::SustainableDevelopment => "s_",
        }
    }

    /// Category identifier used in URLs, display ids and bank file names.
    pub fn slug(self) -> &'static str {
        match self {
            Subject::Psychology => "psychology",
            Subject::ConservationEconomics => "conservation-economics",
            Subject::SustainableDevelopment => "sustainable-development",
        }
    }

    /// Resolves the subject a qid belongs to from its prefix.
    pub fn from_qid(qid: &str) -> Option<Subject> {
        Subject::ALL
            .into_iter()
            .find(|subject| qid.starts_with(subject.prefix()))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownSubject(pub String);

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.slug() == s)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

/// Week key of a question bank (`week0`, `week1`, ...). Orders numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey(pub u32);

impl WeekKey {
    /// Week served when a request names no week at all.
    pub const DEFAULT: WeekKey = WeekKey(1);
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid week key '{0}'")]
pub struct InvalidWeekKey(pub String);

impl FromStr for WeekKey {
    type Err = InvalidWeekKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("week")
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|n| n.parse().ok())
            .map(WeekKey)
            .ok_or_else(|| InvalidWeekKey(s.to_string()))
    }
}

impl TryFrom<String> for WeekKey {
    type Error = InvalidWeekKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(week: WeekKey) -> Self {
        week.to_string()
    }
}

/// A single multiple-choice question from a static bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Globally unique id, namespaced by the subject prefix.
    pub qid: String,

    /// The question text.
    pub question: String,

    /// Ordered options. Texts are not required to be unique.
    pub options: Vec<String>,

    /// The correct option text.
    pub answer: String,
}

impl Question {
    pub fn subject(&self) -> Option<Subject> {
        Subject::from_qid(&self.qid)
    }
}

/// A question as presented in a session, stamped with a positional display id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayQuestion {
    /// `{category}_{index}`, distinct from the semantic qid.
    pub display_id: String,
    #[serde(flatten)]
    pub question: Question,
}

/// Query parameters accepted by `GET /api/questions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionQuery {
    pub category: String,
    pub week: Option<String>,
    /// Comma separated list of week keys.
    pub weeks: Option<String>,
    #[serde(default)]
    pub shuffle_weeks: bool,
    #[serde(default)]
    pub get_weeks: bool,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default)]
    pub shuffle_options: bool,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
}

/// DTO for the study-mode answer check.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckAnswerRequest {
    #[validate(length(min = 3, max = 64))]
    pub qid: String,
    #[validate(length(max = 1000))]
    pub option: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerResponse {
    pub qid: String,
    pub is_correct: bool,
    pub correct_answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_is_resolved_from_qid_prefix() {
        assert_eq!(Subject::from_qid("p_7"), Some(Subject::Psychology));
        assert_eq!(Subject::from_qid("c_12"), Some(Subject::ConservationEconomics));
        assert_eq!(Subject::from_qid("s_1"), Some(Subject::SustainableDevelopment));
        assert_eq!(Subject::from_qid("x_1"), None);
        assert_eq!(Subject::from_qid("p7"), None);
    }

    #[test]
    fn subject_parses_from_slug() {
        let subject: Subject = "conservation-economics".parse().unwrap();
        assert_eq!(subject, Subject::ConservationEconomics);
        assert!("history".parse::<Subject>().is_err());
    }

    #[test]
    fn week_keys_parse_and_order_numerically() {
        let mut weeks: Vec<WeekKey> = ["week10", "week2", "week0"]
            .iter()
            .map(|w| w.parse().unwrap())
            .collect();
        weeks.sort();
        let names: Vec<String> = weeks.iter().map(|w| w.to_string()).collect();
        assert_eq!(names, vec!["week0", "week2", "week10"]);

        assert!("week".parse::<WeekKey>().is_err());
        assert!("weekX".parse::<WeekKey>().is_err());
        assert!("month1".parse::<WeekKey>().is_err());
        assert!("week-1".parse::<WeekKey>().is_err());
    }

    #[test]
    fn display_question_flattens_the_question() {
        let q = DisplayQuestion {
            display_id: "psychology_0".to_string(),
            question: Question {
                qid: "p_1".to_string(),
                question: "Q?".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                answer: "A".to_string(),
            },
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["displayId"], "psychology_0");
        assert_eq!(value["qid"], "p_1");
        assert_eq!(value["answer"], "A");
    }
}
