//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! the defaults of the poll loop.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default review API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
/// Delay between two poll cycles (seconds). 10 minutes.
pub const DEFAULT_RETRY_TIME_SECS: u64 = 600;
/// Timeout applied to every outgoing HTTP request (seconds).
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
/// Log file the bot appends to.
pub const DEFAULT_LOG_FILE: &str = "main.log";

// Telegram API retry settings
/// Maximum attempts for a single Telegram call.
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// Initial backoff between Telegram attempts (milliseconds).
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for the Telegram backoff (milliseconds).
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;

/// How the poll cursor behaves after a successful cycle.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CursorMode {
    /// Move the cursor to the server's `current_date` after each successful cycle.
    #[default]
    Advance,
    /// Keep polling from the startup timestamp forever.
    Fixed,
}

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Practicum OAuth token
    #[serde(default)]
    pub practicum_token: String,
    /// Legacy name of the Practicum token (`AUTH_TOKEN`)
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,

    /// Telegram Bot API token
    #[serde(default)]
    pub telegram_token: String,

    /// Destination chat: numeric id or `@channel` username
    #[serde(default)]
    pub telegram_chat_id: String,
    /// Legacy name of the destination chat (`CHAT_ID`)
    #[serde(default, skip_serializing)]
    pub chat_id: Option<String>,

    /// Review API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Delay between cycles, in seconds
    #[serde(default = "default_retry_time_secs")]
    pub retry_time_secs: u64,

    /// HTTP timeout, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Cursor policy
    #[serde(default)]
    pub cursor_mode: CursorMode,

    /// Initial cursor; startup time when unset
    pub start_from_date: Option<i64>,

    /// Path of the append-only log file
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_retry_time_secs() -> u64 {
    DEFAULT_RETRY_TIME_SECS
}

const fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            practicum_token: String::new(),
            auth_token: None,
            telegram_token: String::new(),
            telegram_chat_id: String::new(),
            chat_id: None,
            endpoint: default_endpoint(),
            retry_time_secs: DEFAULT_RETRY_TIME_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            cursor_mode: CursorMode::default(),
            start_from_date: None,
            log_file: default_log_file(),
        }
    }
}

/// Build the layered configuration source.
///
/// Order: `config/default`, `config/{RUN_MODE}`, `config/local`, `APP__*`
/// variables, then plain environment variables.
///
/// # Errors
///
/// Returns a `ConfigError` if a source cannot be read.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Local overrides, not checked into git
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Plain variables: `TELEGRAM_TOKEN` -> `telegram_token`; empty means unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use homework_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or a required value is missing.
    pub fn new() -> Result<Self, ConfigError> {
        let settings: Self = build_config()?.try_deserialize()?;
        let settings = settings.resolve_legacy_names();
        settings.validate()?;
        Ok(settings)
    }

    /// Fill the canonical fields from `AUTH_TOKEN` / `CHAT_ID` when only the
    /// legacy names are set.
    #[must_use]
    pub fn resolve_legacy_names(mut self) -> Self {
        if self.practicum_token.is_empty() {
            if let Some(token) = self.auth_token.take().filter(|t| !t.is_empty()) {
                self.practicum_token = token;
            }
        }
        if self.telegram_chat_id.is_empty() {
            if let Some(chat) = self.chat_id.take().filter(|c| !c.is_empty()) {
                self.telegram_chat_id = chat;
            }
        }
        self
    }

    /// Check that every required credential is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the first missing or invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("PRACTICUM_TOKEN", &self.practicum_token),
            ("TELEGRAM_TOKEN", &self.telegram_token),
            ("TELEGRAM_CHAT_ID", &self.telegram_chat_id),
            ("ENDPOINT", &self.endpoint),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!(
                    "required setting {name} is missing or empty"
                )));
            }
        }
        if self.retry_time_secs == 0 {
            return Err(ConfigError::Message(
                "RETRY_TIME_SECS must be greater than zero".to_string(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay between cycles.
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_time_secs)
    }

    /// Timeout for every outgoing request.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
