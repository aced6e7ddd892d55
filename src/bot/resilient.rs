//! Resilient messaging with automatic retry for Telegram API operations.
//!
//! Wraps `sendMessage` so transient network failures are retried with
//! exponential backoff and jitter before the error reaches the caller.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{Message, Recipient};

/// Maximum message length for Telegram with safety margin.
/// Telegram's official limit is 4096.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;

/// Send a plain-text message with automatic retry on network failures.
///
/// Uses [`crate::utils::retry_telegram_operation`] with exponential backoff.
///
/// # Errors
///
/// Returns the last Telegram error after all retries are exhausted.
pub async fn send_message_resilient(
    bot: &Bot,
    recipient: &Recipient,
    text: impl Into<String>,
) -> Result<Message> {
    let text = text.into();
    crate::utils::retry_telegram_operation(|| async {
        bot.send_message(recipient.clone(), text.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Telegram send error: {e}"))
    })
    .await
}

/// Cut text to the Telegram limit, marking the cut.
#[must_use]
pub fn fit_message(text: &str) -> String {
    if text.chars().count() > TELEGRAM_MESSAGE_LIMIT {
        let truncated = crate::utils::truncate_str(text, TELEGRAM_MESSAGE_LIMIT);
        format!("{truncated}...\n\n(сообщение обрезано)")
    } else {
        text.to_string()
    }
}
