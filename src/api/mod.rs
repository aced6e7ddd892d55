//! Review API client.
//!
//! [`ReviewApi`] is the seam the poll loop talks to; [`PracticumClient`]
//! is the HTTP implementation.

use crate::config::Settings;
use crate::error::BotError;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{error, info};

/// HTTP helpers for the review API.
pub mod http_utils;

/// Source of homework statuses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Fetch homeworks updated since `from_date` (Unix seconds).
    ///
    /// Returns the parsed JSON answer; the shape is checked later by
    /// [`crate::homework::check_response`].
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, BotError>;
}

/// Client for the Practicum `homework_statuses` endpoint.
pub struct PracticumClient {
    http: HttpClient,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Creates a client from settings; the request timeout comes from
    /// `HTTP_TIMEOUT_SECS`.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(
            http_utils::create_http_client(settings.http_timeout()),
            settings.endpoint.clone(),
            settings.practicum_token.clone(),
        )
    }

    /// Creates a client around an existing HTTP client.
    #[must_use]
    pub fn with_client(http: HttpClient, endpoint: String, token: String) -> Self {
        Self {
            http,
            endpoint,
            token,
        }
    }

    /// Endpoint this client polls.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReviewApi for PracticumClient {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, BotError> {
        info!(from_date, endpoint = %self.endpoint, "Requesting homework statuses");

        let auth = format!("OAuth {}", self.token);
        let query = [("from_date", from_date.to_string())];

        match http_utils::send_get_request(&self.http, &self.endpoint, &auth, &query).await {
            Ok(answer) => {
                info!("Server response received");
                Ok(answer)
            }
            Err(e) => {
                error!(kind = e.kind(), "Review API request failed: {e}");
                Err(e)
            }
        }
    }
}
