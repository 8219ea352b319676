use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::{
    data::whitelist_entry::WhitelistEntryRepository,
    error::AppError,
    model::{
        outcome::{ActionFailure, Delivery},
        panel::WhitelistFileEntry,
        whitelist_entry::{CreateWhitelistEntryParam, Requester, WhitelistEntry, WhitelistReply},
    },
    service::{command::CommandService, panel::PanelApi},
};

const WHITELIST_FILE: &str = "/whitelist.json";

/// Whitelist changes on the game server, tracked per Discord member.
pub struct WhitelistService<'a> {
    db: &'a DatabaseConnection,
    commands: &'a CommandService,
    panel: &'a dyn PanelApi,
}

impl<'a> WhitelistService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        commands: &'a CommandService,
        panel: &'a dyn PanelApi,
    ) -> Self {
        Self {
            db,
            commands,
            panel,
        }
    }

    /// Whitelists a player on the server and records it for the requester.
    ///
    /// A name the server reports as already whitelisted is recorded too, so members can
    /// claim names that were added by hand.
    pub async fn add(
        &self,
        requester: &Requester,
        player: &str,
    ) -> Result<WhitelistReply, AppError> {
        let repo = WhitelistEntryRepository::new(self.db);

        if let Some(entry) = repo.find_by_player_name(player).await? {
            return Ok(WhitelistReply::AlreadyRecorded {
                by: entry.discord_name,
            });
        }

        let outcome = self.commands.whitelist_add(player).await;
        let accepted =
            outcome.success || outcome.failure == Some(ActionFailure::AlreadyWhitelisted);
        if !accepted {
            return Ok(WhitelistReply::Failed(
                outcome
                    .failure
                    .unwrap_or_else(|| ActionFailure::Unexpected("no response".to_string())),
            ));
        }

        repo.create(CreateWhitelistEntryParam {
            player_name: player.to_string(),
            discord_id: requester.discord_id,
            discord_name: requester.discord_name.clone(),
        })
        .await?;

        tracing::info!(
            "{} ({}) whitelisted {}",
            requester.discord_name,
            requester.discord_id,
            player
        );

        Ok(WhitelistReply::Added {
            confirmed: outcome.delivery == Delivery::Console,
        })
    }

    /// Removes a player the requester added earlier.
    pub async fn remove(
        &self,
        requester: &Requester,
        player: &str,
    ) -> Result<WhitelistReply, AppError> {
        let repo = WhitelistEntryRepository::new(self.db);

        let Some(entry) = repo.find_by_player_name(player).await? else {
            return Ok(WhitelistReply::NotRecorded);
        };
        if entry.discord_id != requester.discord_id {
            return Ok(WhitelistReply::NotOwner {
                by: entry.discord_name,
            });
        }

        let outcome = self.commands.whitelist_remove(player).await;
        let removed = outcome.success || outcome.failure == Some(ActionFailure::NotWhitelisted);
        if !removed {
            return Ok(WhitelistReply::Failed(
                outcome
                    .failure
                    .unwrap_or_else(|| ActionFailure::Unexpected("no response".to_string())),
            ));
        }

        repo.delete_by_player_name(player).await?;
        tracing::info!(
            "{} ({}) removed {} from the whitelist",
            requester.discord_name,
            requester.discord_id,
            player
        );

        Ok(WhitelistReply::Removed)
    }

    /// Names the member has whitelisted through the bot.
    pub async fn entries_for(&self, discord_id: u64) -> Result<Vec<WhitelistEntry>, AppError> {
        WhitelistEntryRepository::new(self.db)
            .get_by_discord_id(discord_id)
            .await
    }

    /// Every name on the server's whitelist, read from its whitelist file.
    pub async fn server_whitelist(&self) -> Result<Vec<String>, AppError> {
        let contents = self.panel.read_file(WHITELIST_FILE).await?;
        let entries: Vec<WhitelistFileEntry> = serde_json::from_str(&contents).map_err(|e| {
            AppError::InternalError(format!("Invalid {}: {}", WHITELIST_FILE, e))
        })?;

        Ok(entries.into_iter().map(|entry| entry.name).collect())
    }
}
