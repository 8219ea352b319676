use dioxus_logger::tracing;
use serenity::all::{Context, Message};

use crate::{
    bot::{
        command::{self, ChatCommand},
        handler::Handler,
        reply,
    },
    error::AppError,
    model::whitelist_entry::Requester,
    service::whitelist::WhitelistService,
};

/// Handle message creation in a channel
pub async fn handle_message(handler: &Handler, ctx: Context, message: Message) {
    // Only guild channels, never other bots
    if message.author.bot || message.guild_id.is_none() {
        return;
    }

    let Some(parsed) = command::parse(&handler.prefix, &message.content) else {
        return;
    };

    let text = match parsed {
        Ok(command) => match execute(handler, &message, command).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    "Failed to run command `{}` for {}: {}",
                    message.content,
                    message.author.name,
                    e
                );
                "❌ Something went wrong, please try again later.".to_string()
            }
        },
        Err(e) => e.to_string(),
    };

    if let Err(e) = message.reply(&ctx.http, text).await {
        tracing::error!(
            "Failed to reply in channel {}: {}",
            message.channel_id.get(),
            e
        );
    }
}

async fn execute(
    handler: &Handler,
    message: &Message,
    command: ChatCommand,
) -> Result<String, AppError> {
    let service = WhitelistService::new(&handler.db, &handler.commands, handler.panel.as_ref());
    let requester = Requester {
        discord_id: message.author.id.get(),
        discord_name: message.author.name.clone(),
    };

    let text = match command {
        ChatCommand::Whitelist(player) => {
            let result = service.add(&requester, &player).await?;
            reply::whitelist_reply(&player, &result)
        }
        ChatCommand::Unwhitelist(player) => {
            let result = service.remove(&requester, &player).await?;
            reply::whitelist_reply(&player, &result)
        }
        ChatCommand::Whitelisted => {
            let entries = service.entries_for(requester.discord_id).await?;
            let server = match service.server_whitelist().await {
                Ok(names) => Some(names),
                Err(e) => {
                    tracing::warn!("Failed to read the server whitelist: {}", e);
                    None
                }
            };
            reply::entries_reply(&entries, server.as_deref())
        }
        ChatCommand::Players => match handler.commands.list_players().await {
            Ok(roster) => reply::players_reply(&roster),
            Err(e) => format!("❌ Could not get the player list: {}", e),
        },
        ChatCommand::Help => command::help(&handler.prefix),
    };

    Ok(text)
}
