//! Protocol messages between the participant client and the coordinator.
//!
//! All messages are serialized as JSON over WebSocket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RoundError;
use crate::models::{AnswerPayload, CHOICE_COUNT, Judgment, Question, QuestionKind, QuestionType, Scores};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Client wants to join with a username.
    Join { username: String },

    /// Client submits its answer for the current question.
    SubmitAnswer {
        request_id: Uuid,
        answer: AnswerPayload,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Connection accepted, waiting for Join message.
    ConnectionAck,

    /// Username accepted.
    JoinAccepted { username: String },

    /// Username rejected (taken, invalid length, etc.).
    JoinRejected { reason: String },

    /// Between rounds.
    WaitingForNextRound,

    /// A new question is open for answers.
    Question { question: QuestionMessage },

    /// Judgment for an earlier `SubmitAnswer`.
    Verdict {
        request_id: Uuid,
        judgment: Judgment,
    },

    /// The server refused to judge an earlier `SubmitAnswer`.
    AnswerRejected { request_id: Uuid, reason: String },

    /// Round statistics, sent to every participant once answers close.
    Stats {
        question: QuestionMessage,
        judgment: Judgment,
    },

    /// Current standings.
    Scoreboard { scores: Scores },

    /// Server is shutting down.
    ServerClosing,
}

/// A question as it travels over the wire, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
}

impl TryFrom<QuestionMessage> for Question {
    type Error = RoundError;

    fn try_from(message: QuestionMessage) -> Result<Self, Self::Error> {
        let kind = match message.kind.parse::<QuestionType>()? {
            QuestionType::Choice => {
                let count = message.options.len();
                let options: [String; CHOICE_COUNT] =
                    message.options.try_into().map_err(|_| {
                        RoundError::MalformedQuestion(format!(
                            "choice question needs {CHOICE_COUNT} options, got {count}"
                        ))
                    })?;
                QuestionKind::Choice { options }
            }
            QuestionType::Estimate => QuestionKind::Estimate,
            QuestionType::Open => QuestionKind::Open,
        };
        Question::new(message.prompt, kind, message.start, message.end)
    }
}

impl From<&Question> for QuestionMessage {
    fn from(question: &Question) -> Self {
        Self {
            kind: question.question_type().to_string(),
            prompt: question.prompt().to_string(),
            options: question
                .options()
                .map(|options| options.to_vec())
                .unwrap_or_default(),
            start: question.start(),
            end: question.end(),
        }
    }
}

/// Username validation constants.
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 16;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8712;

/// Validates a username according to the rules.
///
/// Returns `Ok(())` if valid, or `Err` with an error message.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let length = username.trim().chars().count();

    if length < USERNAME_MIN_LENGTH {
        return Err("Username must be at least 3 characters");
    }

    if length > USERNAME_MAX_LENGTH {
        return Err("Username must be at most 16 characters");
    }

    Ok(())
}
