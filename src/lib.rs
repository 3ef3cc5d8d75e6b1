//! # trivia-client
//!
//! Participant side of a live trivia session: receives questions from a
//! coordinator, takes exactly one answer per question, and shows round
//! statistics and the scoreboard.
//!
//! The [`round`] module holds the state machine and is independent of any
//! UI or transport. [`client`] wires it to a WebSocket connection and a
//! terminal UI.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_client::client::{self, ClientConfig};
//! use trivia_client::ClientError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClientError> {
//!     let config = ClientConfig {
//!         username: Some("alice".to_string()),
//!         ..ClientConfig::default()
//!     };
//!     client::run(config).await
//! }
//! ```

pub mod client;
mod error;
pub mod models;
pub mod protocol;
pub mod round;
pub mod terminal;

pub use error::{ClientError, JudgeError, RoundError};
pub use models::{AnswerPayload, Judgment, Question, QuestionKind, QuestionType, Scores};
pub use round::{AnswerJudge, Renderer, RoundConfig, RoundController, RoundEvent, RoundPhase};
