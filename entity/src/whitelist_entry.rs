use sea_orm::entity::prelude::*;

/// A player name whitelisted through the bot, along with the Discord member who added it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "whitelist_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Name as the member typed it
    pub player_name: String,
    /// Lowercased name; the game server compares names without case
    #[sea_orm(unique)]
    pub player_key: String,
    pub discord_id: String,
    pub discord_name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
