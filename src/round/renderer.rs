//! Contract between the round controller and whatever draws the UI.

use crate::models::{AnswerPayload, Question, Scores, Solution};

use super::clock::Countdown;
use super::stats::StatsView;

/// Correctness decoration for the play screen once the judge has answered.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerVerdict {
    /// Server-authoritative result.
    pub success: bool,
    pub solution: Solution,
    /// Advisory fuzzy-match result, only for open questions. May disagree
    /// with `success`.
    pub local_match: Option<bool>,
}

/// Receives state transitions from the controller and updates the visible UI.
///
/// Implementations must not call back into the controller.
pub trait Renderer {
    fn enter_waiting(&mut self);

    fn enter_playing(&mut self, question: &Question);

    fn decorate_answer_pending(&mut self, answer: &AnswerPayload);

    fn decorate_answer_result(&mut self, verdict: &AnswerVerdict);

    fn enter_stats(&mut self, question: &Question, answer: Option<&AnswerPayload>, stats: &StatsView);

    fn enter_scoreboard(&mut self, scores: &Scores);

    fn tick_countdown(&mut self, countdown: &Countdown);
}
