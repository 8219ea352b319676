use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::{ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, MessageId, Timestamp},
    http::Http,
};

use crate::{
    error::AppError,
    service::status::{render::StatusRender, StatusSink},
};

/// Status message posted as an embed in a Discord channel.
pub struct DiscordStatusSink {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordStatusSink {
    pub fn new(http: Arc<Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel_id: ChannelId::new(channel_id),
        }
    }
}

#[async_trait]
impl StatusSink for DiscordStatusSink {
    async fn create(&self, render: &StatusRender) -> Result<u64, AppError> {
        let message = CreateMessage::new().embed(build_embed(render)?);
        let message = self.channel_id.send_message(&self.http, message).await?;

        Ok(message.id.get())
    }

    async fn edit(&self, message_id: u64, render: &StatusRender) -> Result<(), AppError> {
        let edit = EditMessage::new().embed(build_embed(render)?);
        self.http
            .edit_message(self.channel_id, MessageId::new(message_id), &edit, vec![])
            .await?;

        Ok(())
    }
}

fn build_embed(render: &StatusRender) -> Result<CreateEmbed, AppError> {
    let now = chrono::Utc::now();
    let timestamp = Timestamp::from_unix_timestamp(now.timestamp())
        .map_err(|e| AppError::InternalError(format!("Invalid timestamp {}: {}", now, e)))?;

    let embed = render.fields.iter().fold(
        CreateEmbed::new().title(&render.title).color(render.color),
        |embed, field| embed.field(&field.name, &field.value, field.inline),
    );

    Ok(embed
        .footer(CreateEmbedFooter::new("Last updated"))
        .timestamp(timestamp))
}
