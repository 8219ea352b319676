//! Whitelist entry factory for creating test whitelist rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test whitelist entries with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::whitelist_entry::WhitelistEntryFactory;
///
/// let entry = WhitelistEntryFactory::new(&db)
///     .player_name("Steve")
///     .discord_id("123456789")
///     .build()
///     .await?;
/// ```
pub struct WhitelistEntryFactory<'a> {
    db: &'a DatabaseConnection,
    player_name: String,
    discord_id: String,
    discord_name: String,
}

impl<'a> WhitelistEntryFactory<'a> {
    /// Creates a new WhitelistEntryFactory with default values.
    ///
    /// Defaults:
    /// - player_name: `"Player{id}"` where id is auto-incremented
    /// - discord_id: `"{id}"`
    /// - discord_name: `"member{id}"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            player_name: format!("Player{}", id),
            discord_id: id.to_string(),
            discord_name: format!("member{}", id),
        }
    }

    /// Sets the in-game player name.
    pub fn player_name(mut self, player_name: impl Into<String>) -> Self {
        self.player_name = player_name.into();
        self
    }

    /// Sets the Discord ID of the member who added the entry.
    pub fn discord_id(mut self, discord_id: impl Into<String>) -> Self {
        self.discord_id = discord_id.into();
        self
    }

    /// Sets the Discord name of the member who added the entry.
    pub fn discord_name(mut self, discord_name: impl Into<String>) -> Self {
        self.discord_name = discord_name.into();
        self
    }

    /// Builds and inserts the whitelist entry into the database.
    ///
    /// # Returns
    /// - `Ok(entity::whitelist_entry::Model)` - Created entry
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::whitelist_entry::Model, DbErr> {
        entity::whitelist_entry::ActiveModel {
            player_key: ActiveValue::Set(self.player_name.to_lowercase()),
            player_name: ActiveValue::Set(self.player_name),
            discord_id: ActiveValue::Set(self.discord_id),
            discord_name: ActiveValue::Set(self.discord_name),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a whitelist entry with default values.
///
/// Shorthand for `WhitelistEntryFactory::new(db).build().await`.
pub async fn create_whitelist_entry(
    db: &DatabaseConnection,
) -> Result<entity::whitelist_entry::Model, DbErr> {
    WhitelistEntryFactory::new(db).build().await
}
