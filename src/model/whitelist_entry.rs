//! Parameter models for whitelist bookkeeping.

use chrono::{DateTime, Utc};

use crate::{
    error::AppError, model::outcome::ActionFailure, util::parse::parse_u64_from_string,
};

/// A player name whitelisted through the bot.
#[derive(Debug, Clone, PartialEq)]
pub struct WhitelistEntry {
    pub id: i32,
    pub player_name: String,
    /// Discord ID of the member who added the name
    pub discord_id: u64,
    pub discord_name: String,
    pub created_at: DateTime<Utc>,
}

impl WhitelistEntry {
    /// Converts an entity model to a whitelist entry.
    ///
    /// Entity models never leave the data layer; this conversion happens at its boundary.
    ///
    /// # Returns
    /// - `Ok(WhitelistEntry)` - The converted entry
    /// - `Err(AppError::InternalErr(ParseStringId))` - Stored Discord ID is not a u64
    pub fn from_entity(entity: entity::whitelist_entry::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            player_name: entity.player_name,
            discord_id: parse_u64_from_string(entity.discord_id)?,
            discord_name: entity.discord_name,
            created_at: entity.created_at,
        })
    }
}

/// Parameters for recording a new whitelist entry.
#[derive(Debug, Clone)]
pub struct CreateWhitelistEntryParam {
    pub player_name: String,
    pub discord_id: u64,
    pub discord_name: String,
}

/// The Discord member asking for a whitelist change.
#[derive(Debug, Clone)]
pub struct Requester {
    pub discord_id: u64,
    pub discord_name: String,
}

/// What a whitelist request ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum WhitelistReply {
    /// On the server's whitelist and recorded for the requester. `confirmed` is false when
    /// the command went through the HTTP fallback without console feedback.
    Added { confirmed: bool },
    /// Off the server's whitelist and the record deleted.
    Removed,
    /// The name is already recorded, by the named member.
    AlreadyRecorded { by: String },
    /// The name was added by another member, who alone may remove it.
    NotOwner { by: String },
    /// The name was never whitelisted through the bot.
    NotRecorded,
    /// The server rejected or did not confirm the change.
    Failed(ActionFailure),
}
