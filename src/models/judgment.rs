use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::QuestionType;

/// Letters used to label choice options.
pub const CHOICE_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// How many participants picked each option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceDistribution {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

impl ChoiceDistribution {
    pub fn counts(&self) -> [u32; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

/// Aggregate of all estimates for a round. Fields are absent when nobody answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateSummary {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub correct: u32,
}

/// Verdict and round aggregates returned by the judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Judgment {
    Choice {
        success: bool,
        solution: usize,
        #[serde(default)]
        distribution: ChoiceDistribution,
    },
    Estimate {
        success: bool,
        solution: f64,
        #[serde(default)]
        summary: EstimateSummary,
    },
    Open {
        success: bool,
        solution: String,
        /// Submitted answer text to number of participants.
        #[serde(default)]
        distribution: BTreeMap<String, u32>,
    },
}

impl Judgment {
    /// Server-authoritative correctness of the participant's answer.
    pub fn success(&self) -> bool {
        match self {
            Self::Choice { success, .. }
            | Self::Estimate { success, .. }
            | Self::Open { success, .. } => *success,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Choice { .. } => QuestionType::Choice,
            Self::Estimate { .. } => QuestionType::Estimate,
            Self::Open { .. } => QuestionType::Open,
        }
    }

    pub fn solution(&self) -> Solution {
        match self {
            Self::Choice { solution, .. } => Solution::Choice(*solution),
            Self::Estimate { solution, .. } => Solution::Estimate(*solution),
            Self::Open { solution, .. } => Solution::Open(solution.clone()),
        }
    }
}

/// Canonical answer of a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    Choice(usize),
    Estimate(f64),
    Open(String),
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choice(idx) => match CHOICE_LETTERS.get(*idx) {
                Some(letter) => write!(f, "{letter}"),
                None => write!(f, "#{idx}"),
            },
            Self::Estimate(value) => write!(f, "{value}"),
            Self::Open(text) => f.write_str(text),
        }
    }
}
