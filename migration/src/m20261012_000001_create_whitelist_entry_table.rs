use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WhitelistEntry::Table)
                    .if_not_exists()
                    .col(pk_auto(WhitelistEntry::Id))
                    .col(string(WhitelistEntry::PlayerName))
                    .col(string(WhitelistEntry::PlayerKey).unique_key())
                    .col(string(WhitelistEntry::DiscordId))
                    .col(string(WhitelistEntry::DiscordName))
                    .col(
                        timestamp(WhitelistEntry::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookups of "names I have added"
        manager
            .create_index(
                Index::create()
                    .name("idx_whitelist_entry_discord_id")
                    .table(WhitelistEntry::Table)
                    .col(WhitelistEntry::DiscordId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_whitelist_entry_discord_id")
                    .table(WhitelistEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(WhitelistEntry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum WhitelistEntry {
    Table,
    Id,
    PlayerName,
    PlayerKey,
    DiscordId,
    DiscordName,
    CreatedAt,
}
