use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Message, Ready};
use serenity::async_trait;

use crate::service::{command::CommandService, panel::PanelApi};

pub mod message;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub commands: Arc<CommandService>,
    pub panel: Arc<dyn PanelApi>,
    pub prefix: String,
}

impl Handler {
    pub fn new(
        db: DatabaseConnection,
        commands: Arc<CommandService>,
        panel: Arc<dyn PanelApi>,
        prefix: String,
    ) -> Self {
        Self {
            db,
            commands,
            panel,
            prefix,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready, &self.prefix).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(self, ctx, message).await;
    }
}
