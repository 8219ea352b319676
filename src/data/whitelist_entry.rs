//! Whitelist entry data repository for database operations.
//!
//! This module provides the `WhitelistEntryRepository` for recording which Discord member
//! whitelisted which player name. The game server's own whitelist stays the source of
//! truth for access; these records only decide who may remove a name again and what a
//! member has added.
//!
//! Player names are matched without regard to case, as the game server does. Lookups go
//! through the lowercased `player_key` column, which also carries the unique constraint.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::{
    error::AppError,
    model::whitelist_entry::{CreateWhitelistEntryParam, WhitelistEntry},
};

/// Repository providing database operations for whitelist entries.
pub struct WhitelistEntryRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WhitelistEntryRepository<'a> {
    /// Creates a new WhitelistEntryRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a player name for the member who added it.
    ///
    /// # Arguments
    /// - `param` - Player name and the member's Discord ID and name
    ///
    /// # Returns
    /// - `Ok(WhitelistEntry)` - The created entry
    /// - `Err(AppError::DbErr)` - Database error, including a player name already recorded
    ///   in any letter case
    pub async fn create(&self, param: CreateWhitelistEntryParam) -> Result<WhitelistEntry, AppError> {
        let entity = entity::whitelist_entry::ActiveModel {
            id: ActiveValue::NotSet,
            player_key: ActiveValue::Set(player_key(&param.player_name)),
            player_name: ActiveValue::Set(param.player_name),
            discord_id: ActiveValue::Set(param.discord_id.to_string()),
            discord_name: ActiveValue::Set(param.discord_name),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        WhitelistEntry::from_entity(entity)
    }

    /// Finds the entry for a player name, in any letter case.
    ///
    /// # Returns
    /// - `Ok(Some(WhitelistEntry))` - Name was whitelisted through the bot
    /// - `Ok(None)` - No record for this name
    /// - `Err(AppError)` - Database error or corrupt Discord ID
    pub async fn find_by_player_name(
        &self,
        player_name: &str,
    ) -> Result<Option<WhitelistEntry>, AppError> {
        let entity = entity::prelude::WhitelistEntry::find()
            .filter(entity::whitelist_entry::Column::PlayerKey.eq(player_key(player_name)))
            .one(self.db)
            .await?;

        entity.map(WhitelistEntry::from_entity).transpose()
    }

    /// Gets every entry a member has added, oldest first.
    pub async fn get_by_discord_id(&self, discord_id: u64) -> Result<Vec<WhitelistEntry>, AppError> {
        let entities = entity::prelude::WhitelistEntry::find()
            .filter(entity::whitelist_entry::Column::DiscordId.eq(discord_id.to_string()))
            .order_by_asc(entity::whitelist_entry::Column::CreatedAt)
            .order_by_asc(entity::whitelist_entry::Column::Id)
            .all(self.db)
            .await?;

        entities
            .into_iter()
            .map(WhitelistEntry::from_entity)
            .collect()
    }

    /// Deletes the entry for a player name, in any letter case.
    ///
    /// # Returns
    /// - `Ok(true)` - An entry was deleted
    /// - `Ok(false)` - No entry existed for this name
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn delete_by_player_name(&self, player_name: &str) -> Result<bool, AppError> {
        let result = entity::prelude::WhitelistEntry::delete_many()
            .filter(entity::whitelist_entry::Column::PlayerKey.eq(player_key(player_name)))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

fn player_key(player_name: &str) -> String {
    player_name.to_lowercase()
}
