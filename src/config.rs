use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

use crate::calendar::ActorId;

/// Used when `DATABASE_URL` is unset or blank.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/calendar.db";

/// Runtime configuration read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot API token from `TELEGRAM_BOT_TOKEN`.
    pub telegram_bot_token: String,
    /// SQLite URL from `DATABASE_URL`.
    pub database_url: String,
    /// Health server port from `HTTP_PORT`.
    pub http_port: u16,
    /// Operator-seeded moderators, promoted at startup.
    pub moderators: Vec<ActorId>,
    /// Bound on each store call, from `STORE_TIMEOUT_SECS`.
    pub store_timeout: Duration,
}

impl Config {
    /// Reads and validates every variable.
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let moderators = env::var("MODERATORS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ActorId::new)
            .collect();

        let timeout_str = env::var("STORE_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string());
        let timeout_secs: u64 = timeout_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid STORE_TIMEOUT_SECS"))?;
        if timeout_secs == 0 {
            return Err(anyhow!("STORE_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(Config {
            telegram_bot_token: token,
            database_url: database_url_from_env(),
            http_port,
            moderators,
            store_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// `DATABASE_URL`, falling back to the default when unset or blank.
pub fn database_url_from_env() -> String {
    match env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_DATABASE_URL.to_string(),
    }
}
