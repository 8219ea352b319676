//! Discord bot integration.
//!
//! The bot answers prefix commands in guild channels and shares its HTTP client with the
//! status poller, which posts and edits the status message without a second connection
//! to Discord.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild availability
//! - `GUILD_MESSAGES` - Messages in guild channels
//! - `MESSAGE_CONTENT` - Message text for prefix commands (privileged intent)
//!
//! Note: `MESSAGE_CONTENT` is a privileged intent and must be explicitly enabled in the
//! Discord Developer Portal for the bot application.

pub mod command;
pub mod handler;
pub mod reply;
pub mod start;
