//! Structured results of console actions.

use thiserror::Error;

/// Why an action did not succeed, phrased for the member who asked for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionFailure {
    #[error("That player is already whitelisted")]
    AlreadyWhitelisted,
    #[error("That player is not whitelisted")]
    NotWhitelisted,
    #[error("That player does not exist")]
    PlayerNotFound,
    #[error("The server did not confirm the action in time")]
    Timeout,
    #[error("The bot is not allowed to run commands on this server")]
    AccessDenied,
    #[error("The server is offline")]
    ServerOffline,
    #[error("Could not reach the server: {0}")]
    Network(String),
    #[error("Unexpected server response: {0}")]
    Unexpected(String),
}

/// Path an action's result came back through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Confirmed by a console output line.
    Console,
    /// Sent through the plain HTTP command endpoint without confirmation.
    Fallback,
}

/// Result of one console action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub failure: Option<ActionFailure>,
    /// The console line that decided the outcome, when there was one.
    pub matched: Option<String>,
    pub delivery: Delivery,
}

impl ActionOutcome {
    pub fn confirmed(matched: String) -> Self {
        Self {
            success: true,
            failure: None,
            matched: Some(matched),
            delivery: Delivery::Console,
        }
    }

    pub fn rejected(failure: ActionFailure, matched: Option<String>) -> Self {
        Self {
            success: false,
            failure: Some(failure),
            matched,
            delivery: Delivery::Console,
        }
    }

    pub fn via_fallback(result: Result<(), ActionFailure>) -> Self {
        Self {
            success: result.is_ok(),
            failure: result.err(),
            matched: None,
            delivery: Delivery::Fallback,
        }
    }
}
