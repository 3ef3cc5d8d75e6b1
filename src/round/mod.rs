//! Round state machine for a single participant.
//!
//! The [`RoundController`] is the only stateful piece: it tracks the current
//! question, guards the single submission per question and decides when the
//! stats screen appears. Drawing is delegated to a [`Renderer`], grading to an
//! [`AnswerJudge`].

pub mod clock;
pub mod controller;
pub mod fuzzy;
pub mod judge;
pub mod renderer;
pub mod stats;
pub mod timer;

pub use clock::{Countdown, Urgency};
pub use controller::{RoundConfig, RoundController, RoundEvent, RoundPhase, Submission};
pub use judge::AnswerJudge;
pub use renderer::{AnswerVerdict, Renderer};
pub use stats::StatsView;
