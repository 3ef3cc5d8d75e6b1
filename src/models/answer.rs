use serde::{Deserialize, Serialize};

use super::QuestionType;

/// The participant's submission for the current question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnswerPayload {
    Choice { idx: usize },
    Estimate { estimate: f64 },
    Open { answer: String },
}

impl AnswerPayload {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Choice { .. } => QuestionType::Choice,
            Self::Estimate { .. } => QuestionType::Estimate,
            Self::Open { .. } => QuestionType::Open,
        }
    }
}
