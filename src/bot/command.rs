//! Prefix chat commands.

use thiserror::Error;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Whitelist(String),
    Unwhitelist(String),
    Whitelisted,
    Players,
    Help,
}

/// Why a prefixed message is not a valid command. Shown to the member as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Usage: `{prefix}{command} <player>`")]
    MissingPlayer { prefix: String, command: String },

    #[error("`{0}` is not a valid player name (3-16 letters, digits or underscores)")]
    InvalidPlayer(String),

    #[error("Unknown command `{0}`, try `{1}help`")]
    Unknown(String, String),
}

/// Parses a message into a command.
///
/// # Returns
/// - `None` - Message does not start with the prefix
/// - `Some(Ok(ChatCommand))` - A valid command
/// - `Some(Err(CommandParseError))` - Prefixed but not usable
pub fn parse(prefix: &str, content: &str) -> Option<Result<ChatCommand, CommandParseError>> {
    let body = content.trim().strip_prefix(prefix)?;
    let mut words = body.split_whitespace();
    let name = words.next()?.to_lowercase();
    let argument = words.next();

    let player = |command: &str| match argument {
        Some(player) if is_valid_player_name(player) => Ok(player.to_string()),
        Some(player) => Err(CommandParseError::InvalidPlayer(player.to_string())),
        None => Err(CommandParseError::MissingPlayer {
            prefix: prefix.to_string(),
            command: command.to_string(),
        }),
    };

    let command = match name.as_str() {
        "whitelist" => player("whitelist").map(ChatCommand::Whitelist),
        "unwhitelist" => player("unwhitelist").map(ChatCommand::Unwhitelist),
        "whitelisted" => Ok(ChatCommand::Whitelisted),
        "players" => Ok(ChatCommand::Players),
        "help" => Ok(ChatCommand::Help),
        other => Err(CommandParseError::Unknown(other.to_string(), prefix.to_string())),
    };

    Some(command)
}

/// Player names are 3 to 16 ASCII letters, digits or underscores.
pub fn is_valid_player_name(name: &str) -> bool {
    (3..=16).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn help(prefix: &str) -> String {
    [
        format!("`{}whitelist <player>` - add a player to the server whitelist", prefix),
        format!("`{}unwhitelist <player>` - remove a player you added", prefix),
        format!("`{}whitelisted` - list the players you added", prefix),
        format!("`{}players` - show who is online", prefix),
    ]
    .join("\n")
}
