//! Per-type statistics shown after a round.

use crate::error::RoundError;
use crate::models::{AnswerPayload, CHOICE_COUNT, Judgment, Question, QuestionKind};

use super::fuzzy;

/// Share of the exact value an estimate may be off and still count as close.
pub const ESTIMATE_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceStats {
    pub options: [String; CHOICE_COUNT],
    pub counts: [u32; CHOICE_COUNT],
    pub solution: usize,
    pub picked_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateStats {
    pub exact: f64,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub correct: u32,
    pub close_enough: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAnswerRow {
    pub answer: String,
    pub count: u32,
    pub close_enough: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenStats {
    pub solution: String,
    /// Most frequent answers first.
    pub rows: Vec<OpenAnswerRow>,
    pub close_enough: bool,
}

/// Everything the stats screen needs for one round.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsView {
    Choice(ChoiceStats),
    Estimate(EstimateStats),
    Open(OpenStats),
}

impl StatsView {
    /// Combine the question, the participant's own answer (if any) and the
    /// judgment into a view.
    pub fn build(
        question: &Question,
        answer: Option<&AnswerPayload>,
        judgment: &Judgment,
    ) -> Result<Self, RoundError> {
        match (question.kind(), judgment) {
            (QuestionKind::Choice { options }, Judgment::Choice { solution, distribution, .. }) => {
                let picked_correct =
                    matches!(answer, Some(AnswerPayload::Choice { idx }) if idx == solution);
                Ok(Self::Choice(ChoiceStats {
                    options: options.clone(),
                    counts: distribution.counts(),
                    solution: *solution,
                    picked_correct,
                }))
            }
            (QuestionKind::Estimate, Judgment::Estimate { solution, summary, .. }) => {
                let close_enough = match answer {
                    Some(AnswerPayload::Estimate { estimate }) => {
                        estimate_close_enough(*solution, *estimate)
                    }
                    _ => false,
                };
                Ok(Self::Estimate(EstimateStats {
                    exact: *solution,
                    max: summary.max,
                    min: summary.min,
                    avg: summary.avg,
                    correct: summary.correct,
                    close_enough,
                }))
            }
            (QuestionKind::Open, Judgment::Open { solution, distribution, .. }) => {
                let mut rows: Vec<OpenAnswerRow> = distribution
                    .iter()
                    .map(|(text, count)| OpenAnswerRow {
                        answer: text.clone(),
                        count: *count,
                        close_enough: fuzzy::is_close_enough(solution, text),
                    })
                    .collect();
                rows.sort_by(|a, b| b.count.cmp(&a.count));

                let close_enough = match answer {
                    Some(AnswerPayload::Open { answer }) => {
                        fuzzy::is_close_enough(solution, answer)
                    }
                    _ => false,
                };
                Ok(Self::Open(OpenStats {
                    solution: solution.clone(),
                    rows,
                    close_enough,
                }))
            }
            (kind, judgment) => Err(RoundError::JudgmentMismatch {
                question: kind.question_type(),
                judgment: judgment.question_type(),
            }),
        }
    }
}

/// Whether `estimate` lies strictly within [`ESTIMATE_TOLERANCE`] of `exact`.
pub fn estimate_close_enough(exact: f64, estimate: f64) -> bool {
    (exact - estimate).abs() < exact.abs() * ESTIMATE_TOLERANCE
}
