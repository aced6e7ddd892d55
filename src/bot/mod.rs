//! Delivery of notifications to Telegram.

use crate::config::Settings;
use crate::error::BotError;
use async_trait::async_trait;
use teloxide::types::{ChatId, Recipient};
use teloxide::Bot;
use tracing::{error, info};

/// Retrying wrappers around Telegram calls
pub mod resilient;

/// Destination for notification texts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the configured chat.
    async fn send_message(&self, text: &str) -> Result<(), BotError>;
}

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    /// Build a bot whose HTTP client uses the configured timeout.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let bot = teloxide::net::default_reqwest_settings()
            .timeout(settings.http_timeout())
            .build()
            .map_or_else(
                |_| Bot::new(settings.telegram_token.clone()),
                |client| Bot::with_client(settings.telegram_token.clone(), client),
            );
        Self::with_bot(bot, parse_recipient(&settings.telegram_chat_id))
    }

    /// Wrap an existing bot.
    #[must_use]
    pub fn with_bot(bot: Bot, recipient: Recipient) -> Self {
        Self { bot, recipient }
    }

    /// Chat the notifier sends to.
    #[must_use]
    pub const fn recipient(&self) -> &Recipient {
        &self.recipient
    }
}

/// Interpret the configured chat: a numeric id, or a channel username.
#[must_use]
pub fn parse_recipient(chat: &str) -> Recipient {
    let chat = chat.trim();
    match chat.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if chat.starts_with('@') => Recipient::ChannelUsername(chat.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{chat}")),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> Result<(), BotError> {
        let text = resilient::fit_message(text);
        match resilient::send_message_resilient(&self.bot, &self.recipient, text.as_str()).await {
            Ok(_) => {
                info!("Message sent: {text}");
                Ok(())
            }
            Err(e) => {
                error!("Failed to send message to {:?}: {e}", self.recipient);
                Err(BotError::Transport(e.to_string()))
            }
        }
    }
}
