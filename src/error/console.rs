use std::time::Duration;
use thiserror::Error;

/// Failures of the console stream and the waiters registered on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// No console line matched the waiter's pattern before its deadline.
    #[error("No matching console output within {timeout:?}")]
    Timeout {
        /// The window the waiter was registered with
        timeout: Duration,
    },

    /// The stream was not authenticated when the action needed it.
    #[error("The console stream is not connected")]
    NotConnected,

    /// A matched line could not be interpreted.
    #[error("Unexpected console output: {0}")]
    UnexpectedOutput(String),

    /// The waiter registry was cleared (session disconnected) while the waiter was pending.
    #[error("The console stream was closed while waiting for output")]
    Closed,
}
