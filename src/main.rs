mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod util;

use std::sync::Arc;

use dioxus_logger::tracing::{self, Level};

use crate::{
    bot::handler::Handler,
    config::Config,
    error::AppError,
    service::{
        command::CommandService,
        console::{ConsoleSession, SessionConfig},
        panel::{PanelApi, PanelClient},
        query::{PlayerQuery, QueryClient},
        status::{discord::DiscordStatusSink, StatusPoller},
    },
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    dioxus_logger::init(Level::INFO)
        .map_err(|e| AppError::InternalError(format!("Failed to initialize logger: {}", e)))?;

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client(&config)?;

    let panel: Arc<dyn PanelApi> = Arc::new(PanelClient::new(
        http_client,
        &config.panel_url,
        &config.panel_server_id,
    ));

    let console = ConsoleSession::new(panel.clone(), SessionConfig::new(&config.panel_url));
    console.connect().await;

    let commands = Arc::new(CommandService::new(
        Arc::new(console.clone()),
        panel.clone(),
    ));

    tracing::info!("Starting bot");

    let handler = Handler::new(
        db.clone(),
        commands.clone(),
        panel.clone(),
        config.command_prefix.clone(),
    );
    let (bot_client, discord_http) =
        bot::start::init_bot(&config.discord_bot_token, handler).await?;
    let shard_manager = bot_client.shard_manager.clone();

    // Start Discord bot in a separate task
    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(bot_client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    let mut status_scheduler = match config.status_channel_id {
        Some(channel_id) => {
            let query = config
                .query_address
                .as_ref()
                .map(|address| Arc::new(QueryClient::new(address.clone())) as Arc<dyn PlayerQuery>);
            let poller = Arc::new(StatusPoller::new(
                panel.clone(),
                commands.clone(),
                query,
                Arc::new(DiscordStatusSink::new(discord_http, channel_id)),
            ));

            Some(scheduler::status::start_scheduler(poller, config.status_interval).await?)
        }
        None => {
            tracing::info!("STATUS_CHANNEL_ID not set, status message disabled");
            None
        }
    };

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to listen for Ctrl-C: {}", e)))?;

    tracing::info!("Shutting down");

    if let Some(scheduler) = status_scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    console.disconnect();
    shard_manager.shutdown_all().await;

    Ok(())
}
