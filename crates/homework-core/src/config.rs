//! Bot configuration.
//!
//! Credentials come from the process environment and are checked once at
//! startup. Everything else is a constant with a `with_*` override.
//!
//! # Environment Variables
//!
//! - `PRACTICUM_TOKEN`: OAuth token for the Practicum API
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat that receives the notifications (`CHAT_ID` is
//!   also accepted)

use std::time::Duration;

use crate::error::{HomeworkError, Result};

/// Environment variable for the Practicum API token.
pub const PRACTICUM_TOKEN_ENV: &str = "PRACTICUM_TOKEN";

/// Environment variable for the Telegram bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";

/// Environment variable for the target chat.
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Older name for the target chat variable.
pub const LEGACY_CHAT_ID_ENV: &str = "CHAT_ID";

/// Homework statuses endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Pause between two polling cycles.
pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);

/// How far back the first request looks (two weeks).
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(1_209_600);

/// Upper bound for one API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw credential values as found in the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub chat_id: Option<String>,
}

impl Credentials {
    /// Reads the credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the credentials through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            practicum_token: lookup(PRACTICUM_TOKEN_ENV),
            telegram_token: lookup(TELEGRAM_TOKEN_ENV),
            chat_id: lookup(TELEGRAM_CHAT_ID_ENV).or_else(|| lookup(LEGACY_CHAT_ID_ENV)),
        }
    }

    /// Names of the variables that are absent or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN_ENV, &self.practicum_token),
            (TELEGRAM_TOKEN_ENV, &self.telegram_token),
            (TELEGRAM_CHAT_ID_ENV, &self.chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| !is_present(value))
        .map(|(key, _)| key)
        .collect()
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Immutable configuration shared by the fetcher, the notifier and the loop.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// OAuth token for the Practicum API.
    pub practicum_token: String,
    /// Telegram bot token.
    pub telegram_token: String,
    /// Numeric chat id or `@channel` username.
    pub chat_id: String,
    /// API endpoint URL.
    pub endpoint: String,
    /// Sleep between cycles.
    pub retry_period: Duration,
    /// Initial cursor offset from now.
    pub lookback: Duration,
    /// Timeout for one API request.
    pub request_timeout: Duration,
}

impl BotConfig {
    /// Builds the configuration, failing if any credential is missing.
    pub fn from_credentials(credentials: Credentials) -> Result<Self> {
        let missing = credentials.missing();
        if !missing.is_empty() {
            return Err(HomeworkError::MissingCredentials(missing));
        }

        let Credentials {
            practicum_token,
            telegram_token,
            chat_id,
        } = credentials;

        Ok(Self::new(
            practicum_token.unwrap_or_default(),
            telegram_token.unwrap_or_default(),
            chat_id.unwrap_or_default(),
        ))
    }

    /// Creates a config with the default constants.
    pub fn new(
        practicum_token: impl Into<String>,
        telegram_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            practicum_token: practicum_token.into(),
            telegram_token: telegram_token.into(),
            chat_id: chat_id.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry_period: DEFAULT_RETRY_PERIOD,
            lookback: DEFAULT_LOOKBACK,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the retry period.
    pub fn with_retry_period(mut self, period: Duration) -> Self {
        self.retry_period = period;
        self
    }

    /// Sets the initial look-back.
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Cursor value for the first request: now minus the look-back.
    pub fn initial_cursor(&self) -> i64 {
        let lookback = i64::try_from(self.lookback.as_secs()).unwrap_or(i64::MAX);
        chrono::Utc::now().timestamp().saturating_sub(lookback)
    }
}
