use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::{
    config::Config,
    error::{config::ConfigError, AppError},
};

const PANEL_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects to the Sqlite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the HTTP client used for every panel call.
///
/// Carries the API key as a bearer token, asks for JSON and bounds every request by the
/// panel timeout.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Configured client
/// - `Err(AppError::ConfigErr)` - API key is not a valid header value
pub fn setup_reqwest_client(config: &Config) -> Result<reqwest::Client, AppError> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.panel_api_key))
        .map_err(|_| ConfigError::InvalidEnvVar {
            name: "PANEL_API_KEY".to_string(),
            value: "<redacted>".to_string(),
        })?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer);
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(PANEL_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))
}
