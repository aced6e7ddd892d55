#![deny(missing_docs)]
//! Homework status bot library.
//!
//! Polls the Practicum review API, validates the answer and forwards
//! status changes to a Telegram chat.

/// Review API client (fetcher).
pub mod api;
/// Telegram delivery (notifier).
pub mod bot;
/// Configuration management.
pub mod config;
/// Error taxonomy shared by every stage of a cycle.
pub mod error;
/// Homework records, validation and verdict formatting.
pub mod homework;
/// The poll loop.
pub mod poller;
/// Utility functions.
pub mod utils;

pub use error::BotError;
