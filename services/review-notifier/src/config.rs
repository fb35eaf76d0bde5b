//! Configuration types for the review notifier
//!
//! Non-secret settings live in an optional JSON file. Credentials are only
//! ever taken from the environment (or a `.env` file loaded into it).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the Practicum API OAuth token
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the recipient chat identifier
pub const CHAT_ID_VAR: &str = "CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(skip)]
    pub credentials: Credentials,
}

/// Homework status API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticumConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
        }
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_period", with = "humantime_serde")]
    pub retry_period: Duration,
    /// Initial cursor; the current time when unset
    #[serde(default)]
    pub from_date: Option<i64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_period: default_retry_period(),
            from_date: None,
        }
    }
}

/// Secrets required to talk to both APIs
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Config {
    /// Fill in credentials from the process environment
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.credentials = check_tokens(|name| std::env::var(name).ok())?;
        Ok(())
    }
}

/// Verify that all three required variables are present and non-empty.
///
/// Variables are checked in a fixed order and the first missing one is
/// reported, so the caller can tell the operator exactly what to set.
pub fn check_tokens<F>(lookup: F) -> crate::Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let require = |name: &'static str| -> crate::Result<String> {
        match lookup(name) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(crate::NotifierError::MissingVariable(name)),
        }
    };

    Ok(Credentials {
        practicum_token: require(PRACTICUM_TOKEN_VAR)?,
        telegram_token: require(TELEGRAM_TOKEN_VAR)?,
        chat_id: require(CHAT_ID_VAR)?,
    })
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> Duration {
    Duration::from_secs(600)
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::NotifierError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
