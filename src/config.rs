use std::time::Duration;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_STATUS_INTERVAL_SECONDS: u64 = 60;
const MIN_STATUS_INTERVAL_SECONDS: u64 = 10;
const DEFAULT_COMMAND_PREFIX: &str = "!";

pub struct Config {
    pub database_url: String,

    pub discord_bot_token: String,
    pub command_prefix: String,

    /// Base URL of the game panel, without trailing slash
    pub panel_url: String,
    pub panel_api_key: String,
    pub panel_server_id: String,

    /// Channel holding the status message; the poller is disabled when unset
    pub status_channel_id: Option<u64>,
    pub status_interval: Duration,

    /// `host:port` of the game query endpoint
    pub query_address: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let status_channel_id = optional("STATUS_CHANNEL_ID")
            .map(|value| parse_var("STATUS_CHANNEL_ID", value))
            .transpose()?;

        let status_interval_seconds = optional("STATUS_INTERVAL_SECONDS")
            .map(|value| parse_var("STATUS_INTERVAL_SECONDS", value))
            .transpose()?
            .unwrap_or(DEFAULT_STATUS_INTERVAL_SECONDS)
            .max(MIN_STATUS_INTERVAL_SECONDS);

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            command_prefix: optional("COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            panel_url: required("PANEL_URL")?.trim_end_matches('/').to_string(),
            panel_api_key: required("PANEL_API_KEY")?,
            panel_server_id: required("PANEL_SERVER_ID")?,
            status_channel_id,
            status_interval: Duration::from_secs(status_interval_seconds),
            query_address: optional("QUERY_ADDRESS"),
        })
    }
}

fn parse_var(name: &str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("DISCORD_BOT_TOKEN", "bot-token"),
            ("PANEL_URL", "https://panel.example.com/"),
            ("PANEL_API_KEY", "ptlc_key"),
            ("PANEL_SERVER_ID", "1a2b3c4d"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config, AppError> {
        Config::from_lookup(|name| env.get(name).map(|value| value.to_string()))
    }

    #[test]
    fn applies_defaults() {
        let config = load(&base_env()).unwrap();

        assert_eq!(config.panel_url, "https://panel.example.com");
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.status_interval, Duration::from_secs(60));
        assert_eq!(config.status_channel_id, None);
        assert_eq!(config.query_address, None);
    }

    #[test]
    fn reads_optional_values() {
        let mut env = base_env();
        env.insert("STATUS_CHANNEL_ID", "123456789");
        env.insert("STATUS_INTERVAL_SECONDS", "30");
        env.insert("QUERY_ADDRESS", "play.example.com:25565");
        env.insert("COMMAND_PREFIX", "?");

        let config = load(&env).unwrap();

        assert_eq!(config.status_channel_id, Some(123456789));
        assert_eq!(config.status_interval, Duration::from_secs(30));
        assert_eq!(config.query_address.as_deref(), Some("play.example.com:25565"));
        assert_eq!(config.command_prefix, "?");
    }

    #[test]
    fn clamps_short_intervals() {
        let mut env = base_env();
        env.insert("STATUS_INTERVAL_SECONDS", "1");

        let config = load(&env).unwrap();

        assert_eq!(config.status_interval, Duration::from_secs(10));
    }

    #[test]
    fn reports_missing_variable() {
        let mut env = base_env();
        env.remove("PANEL_API_KEY");

        let result = load(&env);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(name))) if name == "PANEL_API_KEY"
        ));
    }

    #[test]
    fn reports_invalid_variable() {
        let mut env = base_env();
        env.insert("STATUS_CHANNEL_ID", "general");

        let result = load(&env);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { name, .. })) if name == "STATUS_CHANNEL_ID"
        ));
    }
}
