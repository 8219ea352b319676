//! Console websocket frames.
//!
//! Frames travel in both directions as JSON objects of the shape
//! `{"event": "...", "args": ["..."]}`.

use serde::{Deserialize, Serialize};

pub const EVENT_AUTH: &str = "auth";
pub const EVENT_SEND_COMMAND: &str = "send command";
pub const EVENT_AUTH_SUCCESS: &str = "auth success";
pub const EVENT_TOKEN_EXPIRING: &str = "token expiring";
pub const EVENT_TOKEN_EXPIRED: &str = "token expired";
pub const EVENT_CONSOLE_OUTPUT: &str = "console output";
pub const EVENT_STATUS: &str = "status";
pub const EVENT_STATS: &str = "stats";

/// A single websocket frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleFrame {
    pub event: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Inbound frame classified by its event tag.
#[derive(Debug, PartialEq)]
pub enum ConsoleEvent<'a> {
    AuthSuccess,
    TokenExpiring,
    TokenExpired,
    /// One or more lines printed by the game server.
    ConsoleOutput(&'a [String]),
    /// Power state change, e.g. `running`.
    Status(Option<&'a str>),
    Stats,
    Other(&'a str),
}

impl ConsoleFrame {
    /// Builds the frame that authenticates (or re-authenticates) the stream.
    pub fn auth(token: impl Into<String>) -> Self {
        Self {
            event: EVENT_AUTH.to_string(),
            args: vec![token.into()],
        }
    }

    /// Builds the frame that types a command into the server console.
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            event: EVENT_SEND_COMMAND.to_string(),
            args: vec![command.into()],
        }
    }

    pub fn kind(&self) -> ConsoleEvent<'_> {
        match self.event.as_str() {
            EVENT_AUTH_SUCCESS => ConsoleEvent::AuthSuccess,
            EVENT_TOKEN_EXPIRING => ConsoleEvent::TokenExpiring,
            EVENT_TOKEN_EXPIRED => ConsoleEvent::TokenExpired,
            EVENT_CONSOLE_OUTPUT => ConsoleEvent::ConsoleOutput(&self.args),
            EVENT_STATUS => ConsoleEvent::Status(self.args.first().map(String::as_str)),
            EVENT_STATS => ConsoleEvent::Stats,
            other => ConsoleEvent::Other(other),
        }
    }
}
