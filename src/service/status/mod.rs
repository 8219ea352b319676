//! Periodic server status message.
//!
//! Every tick builds a fresh snapshot from the panel's resource endpoint and, while the
//! server is running, a player roster from the console or the query protocol. The
//! rendering is written to a single message that is edited in place; when the edit fails
//! the message is posted again and its new handle kept.

pub mod discord;
pub mod render;

use std::sync::Arc;

use async_trait::async_trait;
use dioxus_logger::tracing;
use tokio::sync::Mutex;

use crate::{
    error::AppError,
    model::{
        panel::ServerState,
        status::{PlayerRoster, StatusSnapshot},
    },
    service::{
        command::CommandService, panel::PanelApi, query::PlayerQuery,
        status::render::StatusRender,
    },
};

/// Destination of the status message.
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Posts a new message and returns its handle.
    async fn create(&self, render: &StatusRender) -> Result<u64, AppError>;

    /// Replaces the content of an existing message.
    async fn edit(&self, message_id: u64, render: &StatusRender) -> Result<(), AppError>;
}

pub struct StatusPoller {
    panel: Arc<dyn PanelApi>,
    commands: Arc<CommandService>,
    query: Option<Arc<dyn PlayerQuery>>,
    sink: Arc<dyn StatusSink>,
    /// Handle of the message edited in place; also serialises overlapping ticks
    message_id: Mutex<Option<u64>>,
}

impl StatusPoller {
    pub fn new(
        panel: Arc<dyn PanelApi>,
        commands: Arc<CommandService>,
        query: Option<Arc<dyn PlayerQuery>>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            panel,
            commands,
            query,
            sink,
            message_id: Mutex::new(None),
        }
    }

    /// Runs one tick: snapshot, render, publish.
    ///
    /// # Returns
    /// - `Ok(())`: Status message created or edited
    /// - `Err(AppError)`: Resource fetch or message creation failed; the previous
    ///   rendering stays as it is
    pub async fn poll(&self) -> Result<(), AppError> {
        let snapshot = self.snapshot().await?;
        let render = render::render(&snapshot);

        self.publish(&render).await
    }

    pub async fn message_id(&self) -> Option<u64> {
        *self.message_id.lock().await
    }

    async fn snapshot(&self) -> Result<StatusSnapshot, AppError> {
        let resources = self.panel.resources().await?;

        let roster = if resources.state == ServerState::Running {
            self.roster().await
        } else {
            None
        };

        Ok(StatusSnapshot { resources, roster })
    }

    /// Console first, then the query protocol when configured.
    async fn roster(&self) -> Option<PlayerRoster> {
        let err = match self.commands.list_players().await {
            Ok(roster) => return Some(roster),
            Err(err) => err,
        };

        let query = self.query.as_ref()?;
        tracing::debug!("Console player list unavailable ({}), using query", err);

        match query.players().await {
            Ok(roster) => Some(roster),
            Err(err) => {
                tracing::warn!("Failed to query player list: {}", err);
                None
            }
        }
    }

    async fn publish(&self, render: &StatusRender) -> Result<(), AppError> {
        let mut message_id = self.message_id.lock().await;

        if let Some(id) = *message_id {
            match self.sink.edit(id, render).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    tracing::warn!("Failed to edit status message {}: {}", id, err);
                    *message_id = None;
                }
            }
        }

        let id = self.sink.create(render).await?;
        tracing::info!("Posted new status message {}", id);
        *message_id = Some(id);

        Ok(())
    }
}
