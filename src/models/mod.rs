//! Domain types shared by the round controller, the protocol and the UI.

mod answer;
mod judgment;
mod question;

use std::collections::BTreeMap;

pub use answer::AnswerPayload;
pub use judgment::{CHOICE_LETTERS, ChoiceDistribution, EstimateSummary, Judgment, Solution};
pub use question::{CHOICE_COUNT, Question, QuestionKind, QuestionType};

/// Participant name to score.
pub type Scores = BTreeMap<String, u64>;

/// Scores ordered for display: highest first, ties by name.
pub fn standings(scores: &Scores) -> Vec<(&str, u64)> {
    let mut standings: Vec<(&str, u64)> = scores
        .iter()
        .map(|(name, score)| (name.as_str(), *score))
        .collect();
    standings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    standings
}
