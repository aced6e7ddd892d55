//! HTTP utilities for the review API
//!
//! Request/response handling kept apart from the client so the error
//! mapping can be tested without a server.

use crate::error::BotError;
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Longest body excerpt kept in a protocol error.
const ERROR_BODY_LIMIT: usize = 500;

/// Creates an HTTP client with the given request timeout.
///
/// Prevents a silent hang when the API is slow or unresponsive.
#[must_use]
pub fn create_http_client(timeout: Duration) -> HttpClient {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Sends an authorized GET request and returns the parsed JSON body.
///
/// # Errors
///
/// Returns `BotError::Transport` on connectivity issues and timeouts,
/// `BotError::Protocol` on any status other than 200 or a non-JSON body.
pub async fn send_get_request(
    client: &HttpClient,
    url: &str,
    auth_header: &str,
    query: &[(&str, String)],
) -> Result<Value, BotError> {
    let response = client
        .get(url)
        .header("Authorization", auth_header)
        .query(query)
        .send()
        .await
        .map_err(|e| BotError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| BotError::Transport(e.to_string()))?;

    parse_response(status, &body)
}

/// Turns a status code and body into the parsed answer or a protocol error.
///
/// # Errors
///
/// Returns `BotError::Protocol` for any status other than 200 or a body that
/// is not JSON.
pub fn parse_response(status: StatusCode, body: &str) -> Result<Value, BotError> {
    if status != StatusCode::OK {
        return Err(BotError::Protocol(describe_error_body(status, body)));
    }
    serde_json::from_str(body)
        .map_err(|e| BotError::Protocol(format!("{status}: некорректный JSON ({e})")))
}

/// Builds a short description of a failed response.
///
/// HTML error pages from proxies are not echoed; long bodies are truncated.
#[must_use]
pub fn describe_error_body(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim_start();
    let is_html = trimmed.starts_with("<!DOCTYPE")
        || trimmed.starts_with("<html")
        || trimmed.starts_with("<HTML");

    if is_html {
        format!("{status} (сервер вернул HTML-страницу)")
    } else if body.trim().is_empty() {
        status.to_string()
    } else if body.chars().count() > ERROR_BODY_LIMIT {
        format!(
            "{status} - {}... (обрезано)",
            crate::utils::truncate_str(body, ERROR_BODY_LIMIT)
        )
    } else {
        format!("{status} - {}", body.trim())
    }
}
