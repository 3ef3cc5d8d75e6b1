//! Error types.

use std::io;

use thiserror::Error;

use crate::models::QuestionType;

/// Errors raised by the round controller and at the question boundary.
#[derive(Debug, Error)]
pub enum RoundError {
    #[error("unsupported question type: {0}")]
    UnsupportedQuestionType(String),

    #[error("malformed question: {0}")]
    MalformedQuestion(String),

    #[error("no answer judge connected")]
    NoJudgeConnected,

    #[error("invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("judgment for a {judgment} question does not fit a {question} question")]
    JudgmentMismatch {
        question: QuestionType,
        judgment: QuestionType,
    },

    #[error("answer judge failed: {0}")]
    Judge(#[from] JudgeError),
}

/// Failure of a single judge call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JudgeError {
    #[error("connection to the judge was lost")]
    Disconnected,

    #[error("answer rejected: {0}")]
    Rejected(String),
}

/// Error type for running the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Round(#[from] RoundError),
}
