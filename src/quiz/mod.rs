pub mod catalog;
pub mod flow;
pub mod render;
pub mod submit;

use std::fmt;
use std::str::FromStr;

pub use flow::{Advance, QuizFlow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOption {
    pub key: &'static str,
    pub text: &'static str,
}

impl QuestionOption {
    /// The label stored in an answer slot, e.g. `"A. 我自己"`.
    pub fn label(&self) -> String {
        format!("{}. {}", self.key, self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    pub options: &'static [QuestionOption],
    pub multi: bool,
}

impl Question {
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(QuestionOption::label).collect()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.options.iter().any(|o| o.label() == label)
    }
}

/// A fixed, ordered list of questions for one quiz identifier.
#[derive(Debug, PartialEq, Eq)]
pub struct Catalog {
    pub id: &'static str,
    pub title: &'static str,
    pub questions: &'static [Question],
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizKind {
    Insurance,
    Values,
}

impl QuizKind {
    pub const ALL: [QuizKind; 2] = [QuizKind::Insurance, QuizKind::Values];

    pub fn catalog(self) -> &'static Catalog {
        match self {
            QuizKind::Insurance => &catalog::INSURANCE,
            QuizKind::Values => &catalog::VALUES,
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.catalog().title == title)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown quiz id: {0}")]
pub struct UnknownQuiz(pub String);

impl FromStr for QuizKind {
    type Err = UnknownQuiz;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insurance" => Ok(QuizKind::Insurance),
            "values" => Ok(QuizKind::Values),
            other => Err(UnknownQuiz(other.to_string())),
        }
    }
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog().id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_ids_parse_case_insensitively() {
        assert_eq!(" Insurance ".parse::<QuizKind>(), Ok(QuizKind::Insurance));
        assert_eq!("values".parse::<QuizKind>(), Ok(QuizKind::Values));
        assert!("health".parse::<QuizKind>().is_err());
    }

    #[test]
    fn kinds_round_trip_through_titles() {
        for kind in QuizKind::ALL {
            assert_eq!(QuizKind::from_title(kind.catalog().title), Some(kind));
            assert_eq!(kind.to_string(), kind.catalog().id);
        }
        assert_eq!(QuizKind::from_title("nope"), None);
    }

    #[test]
    fn option_label_joins_key_and_text() {
        let q = &QuizKind::Insurance.catalog().questions[0];
        assert_eq!(q.options[0].label(), "A. 我自己");
        assert!(q.has_label("B. 配偶 / 伴侶"));
        assert!(!q.has_label("B"));
    }
}
