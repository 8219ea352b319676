//! Error types for the bot.
//!
//! `AppError` is the top-level error returned from startup and from the layers that talk
//! to Discord or the database. Errors from the panel, the console stream and the query
//! protocol have their own enums so callers can react to specific kinds. Console and query
//! errors never leave the services that handle them, so only panel errors convert into
//! `AppError`. User-facing action failures are not errors at all, see
//! `model::outcome::ActionOutcome`.

pub mod config;
pub mod console;
pub mod internal;
pub mod panel;
pub mod query;

use thiserror::Error;

use crate::error::{config::ConfigError, internal::InternalError, panel::PanelError};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Game panel HTTP error.
    #[error(transparent)]
    PanelErr(#[from] PanelError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Job scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Unexpected internal state, see `InternalError`.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Internal error with custom message.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
