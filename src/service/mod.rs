//! Business logic.
//!
//! - `panel` - HTTP client for the game panel
//! - `console` - authenticated console stream and its pattern waiters
//! - `command` - console actions with feedback classification and HTTP fallback
//! - `query` - UDP game query client
//! - `status` - periodic status message
//! - `whitelist` - whitelist changes tracked per Discord member

pub mod command;
pub mod console;
pub mod panel;
pub mod query;
pub mod status;
pub mod whitelist;

#[cfg(test)]
pub mod fake;
