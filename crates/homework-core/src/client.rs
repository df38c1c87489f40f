//! Practicum homework API client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::BotConfig;
use crate::error::{HomeworkError, Result};

/// Something that can be asked for homework statuses since a timestamp.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetches the raw payload for updates since `from_date`.
    ///
    /// Returns either the parsed JSON body or an error; never an empty result.
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}

/// HTTP client for the homework statuses endpoint.
#[derive(Clone)]
pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Creates a client from the bot configuration.
    pub fn new(config: &BotConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.practicum_token.clone(),
        })
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Performs a single GET for updates since `from_date`.
    pub async fn fetch(&self, from_date: i64) -> Result<Value> {
        trace!(endpoint = %self.endpoint, from_date, "requesting homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "homework API returned non-OK status");
            return Err(HomeworkError::ApiUnavailable(status.as_u16()));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;

        debug!(from_date, "homework statuses received");
        Ok(value)
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        PracticumClient::fetch(self, from_date).await
    }
}
