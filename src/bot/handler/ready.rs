//! Ready event handler.
//!
//! Fired once per gateway connection after the handshake; logs the bot user and sets its
//! activity to point members at the help command.

use dioxus_logger::tracing;
use serenity::all::{ActivityData, Context, Ready};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
/// - `prefix` - Command prefix shown in the activity
pub async fn handle_ready(ctx: Context, ready: Ready, prefix: &str) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom(format!("{}help", prefix))));
}
