//! Error taxonomy for a polling cycle.
//!
//! Every variant carries a human-readable description that ends up in the
//! failure notification, so the texts are in the same language as the
//! notifications themselves.

use thiserror::Error;

/// Errors that can interrupt a poll cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BotError {
    /// Network or connection failure while talking to the review API or Telegram
    #[error("Ошибка соединения: {0}")]
    Transport(String),
    /// The review API answered with a non-success status or an unreadable body
    #[error("Ошибка ответа сервера: {0}")]
    Protocol(String),
    /// The answer does not have the expected structure or status values
    #[error("Некорректный ответ API: {0}")]
    Validation(String),
    /// A homework record could not be turned into a notification
    #[error("Ошибка формирования сообщения: {0}")]
    Formatting(String),
}

impl BotError {
    /// Short category name used in log lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::Validation(_) => "validation",
            Self::Formatting(_) => "formatting",
        }
    }
}
