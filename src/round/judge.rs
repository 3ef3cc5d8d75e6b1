//! Contract for the remote party that grades submitted answers.

use async_trait::async_trait;

use crate::error::JudgeError;
use crate::models::{AnswerPayload, Judgment};

/// Grades one submission and reports the round's aggregate results.
///
/// A call is never retried; an error is final for that submission.
#[async_trait]
pub trait AnswerJudge: Send + Sync {
    async fn judge(&self, answer: AnswerPayload) -> Result<Judgment, JudgeError>;
}
