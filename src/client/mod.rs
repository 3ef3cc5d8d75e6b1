//! Quiz participant client.
//!
//! Connects to the coordinator over WebSocket and plays rounds in the
//! terminal.

mod client;
mod judge;
mod state;
mod ui;

use crate::protocol::DEFAULT_PORT;
use crate::round::RoundConfig;

pub use client::run;
pub use judge::SocketJudge;
pub use state::{AnswerMark, ClientApp, PlayView, Screen};

/// Settings for [`run`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Join with this name as soon as the server acknowledges the connection.
    pub username: Option<String>,
    pub round: RoundConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            username: None,
            round: RoundConfig::default(),
        }
    }
}
