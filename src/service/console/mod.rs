//! Console stream access.
//!
//! - `session` - the authenticated, self-healing websocket connection
//! - `waiter` - pattern waiters resolved by console output lines
//!
//! The `Console` trait is the seam the command orchestrator is written against, so the
//! orchestrator can be exercised without a live socket.

pub mod session;
pub mod waiter;

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::service::console::waiter::Waiter;

pub use session::{ConsoleSession, SessionConfig};

#[async_trait]
pub trait Console: Send + Sync {
    /// True iff the stream is authenticated and open.
    fn is_connected(&self) -> bool;

    /// Starts a connection cycle; never fails, retries are scheduled internally.
    async fn connect(&self);

    /// Waits up to `timeout` for authentication to complete.
    async fn wait_until_connected(&self, timeout: Duration) -> bool;

    /// Sends a console command; logged no-op when not connected.
    fn send_command(&self, command: &str);

    /// Registers a waiter for the next console line matching `pattern`.
    fn wait_for_message(&self, pattern: Regex, timeout: Duration) -> Waiter;
}
