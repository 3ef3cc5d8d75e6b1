use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RoundError;

use super::AnswerPayload;

/// Number of options offered by a choice question.
pub const CHOICE_COUNT: usize = 4;

/// Type tag shared by questions, answers and judgments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Choice,
    Estimate,
    Open,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Choice => "choice",
            Self::Estimate => "estimate",
            Self::Open => "open",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "choice" => Ok(Self::Choice),
            "estimate" => Ok(Self::Estimate),
            "open" => Ok(Self::Open),
            other => Err(RoundError::UnsupportedQuestionType(other.to_string())),
        }
    }
}

/// Type-specific part of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Choice { options: [String; CHOICE_COUNT] },
    Estimate,
    Open,
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Choice { .. } => QuestionType::Choice,
            Self::Estimate => QuestionType::Estimate,
            Self::Open => QuestionType::Open,
        }
    }
}

/// A validated question with its answer window. Built only through
/// [`Question::new`], so `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    kind: QuestionKind,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Question {
    /// Build a question, checking that the window is not empty.
    pub fn new(
        prompt: impl Into<String>,
        kind: QuestionKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, RoundError> {
        if end <= start {
            return Err(RoundError::MalformedQuestion(format!(
                "answer window ends at {end} but starts at {start}"
            )));
        }
        Ok(Self {
            prompt: prompt.into(),
            kind,
            start,
            end,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Options of a choice question, `None` for the other types.
    pub fn options(&self) -> Option<&[String; CHOICE_COUNT]> {
        match &self.kind {
            QuestionKind::Choice { options } => Some(options),
            _ => None,
        }
    }

    /// Check that `answer` is a well-formed answer to this question.
    pub fn check_answer(&self, answer: &AnswerPayload) -> Result<(), RoundError> {
        if answer.question_type() != self.question_type() {
            return Err(RoundError::InvalidAnswer(format!(
                "{} answer to a {} question",
                answer.question_type(),
                self.question_type()
            )));
        }
        match answer {
            AnswerPayload::Choice { idx } if *idx >= CHOICE_COUNT => Err(
                RoundError::InvalidAnswer(format!("option index {idx} out of range")),
            ),
            AnswerPayload::Estimate { estimate } if !estimate.is_finite() => Err(
                RoundError::InvalidAnswer(format!("estimate {estimate} is not a number")),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn open_question() -> Question {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        Question::new("Capital of France?", QuestionKind::Open, start, start + Duration::seconds(20))
            .unwrap()
    }

    #[test]
    fn test_question_type_parsing() {
        assert_eq!("choice".parse::<QuestionType>().unwrap(), QuestionType::Choice);
        assert_eq!("open".parse::<QuestionType>().unwrap(), QuestionType::Open);
        assert!(matches!(
            "quiz".parse::<QuestionType>(),
            Err(RoundError::UnsupportedQuestionType(t)) if t == "quiz"
        ));
    }

    #[test]
    fn test_empty_window_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        assert!(matches!(
            Question::new("?", QuestionKind::Estimate, start, start),
            Err(RoundError::MalformedQuestion(_))
        ));
        assert!(matches!(
            Question::new("?", QuestionKind::Open, start, start - Duration::seconds(1)),
            Err(RoundError::MalformedQuestion(_))
        ));

        let question = open_question();
        assert!(question.start() < question.end());
        assert_eq!(question.prompt(), "Capital of France?");
        assert_eq!(question.kind(), &QuestionKind::Open);
    }

    #[test]
    fn test_check_answer() {
        let question = open_question();
        assert!(question
            .check_answer(&AnswerPayload::Open { answer: "Paris".into() })
            .is_ok());
        assert!(matches!(
            question.check_answer(&AnswerPayload::Choice { idx: 0 }),
            Err(RoundError::InvalidAnswer(_))
        ));

        let choice = Question::new(
            question.prompt(),
            QuestionKind::Choice {
                options: ["A", "B", "C", "D"].map(String::from),
            },
            question.start(),
            question.end(),
        )
        .unwrap();
        assert!(choice.check_answer(&AnswerPayload::Choice { idx: 3 }).is_ok());
        assert!(choice.check_answer(&AnswerPayload::Choice { idx: 4 }).is_err());
    }
}
