//! The poll loop.
//!
//! Each cycle fetches the answer for the current cursor, validates it and
//! sends one notification per homework. Any failure aborts the cycle and is
//! reported through the notifier; the loop then waits the retry interval and
//! tries again, forever.

use crate::api::ReviewApi;
use crate::bot::Notifier;
use crate::config::{CursorMode, Settings};
use crate::error::BotError;
use crate::homework::{check_response, current_date, parse_status};
use crate::utils::unix_now;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Prefix of every failure notification.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Loop state between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Last cycle succeeded (or none ran yet)
    Polling,
    /// Last cycle failed; waiting before the retry
    ErrorBackoff,
}

/// Outcome of a successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    /// Homeworks in the validated answer
    pub homeworks: usize,
    /// Notifications delivered
    pub sent: usize,
    /// Server timestamp of the answer
    pub current_date: Option<i64>,
}

/// Text sent to the chat when a cycle fails.
#[must_use]
pub fn failure_message(e: &BotError) -> String {
    format!("{FAILURE_PREFIX}: {e}")
}

/// Drives fetch → validate → format → notify.
pub struct Poller {
    api: Arc<dyn ReviewApi>,
    notifier: Arc<dyn Notifier>,
    cursor: i64,
    cursor_mode: CursorMode,
    retry_interval: Duration,
    state: LoopState,
}

impl Poller {
    /// Create a poller; the cursor starts at `START_FROM_DATE` or now.
    #[must_use]
    pub fn new(api: Arc<dyn ReviewApi>, notifier: Arc<dyn Notifier>, settings: &Settings) -> Self {
        Self {
            api,
            notifier,
            cursor: settings.start_from_date.unwrap_or_else(unix_now),
            cursor_mode: settings.cursor_mode,
            retry_interval: settings.retry_interval(),
            state: LoopState::Polling,
        }
    }

    /// Override the starting cursor.
    #[must_use]
    pub const fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    /// Override the delay between cycles.
    #[must_use]
    pub const fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Timestamp the next fetch starts from.
    #[must_use]
    pub const fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Current loop state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// One fetch → validate → format → notify pass.
    ///
    /// Stops at the first failing stage; notifications already delivered in
    /// this cycle are not rolled back.
    ///
    /// # Errors
    ///
    /// Returns the first `BotError` raised by any stage.
    pub async fn run_cycle(&self) -> Result<CycleReport, BotError> {
        debug!(cursor = self.cursor, "Bot is running");

        let answer = self.api.get_api_answer(self.cursor).await?;
        let homeworks = check_response(&answer)?;

        let mut sent = 0;
        for homework in &homeworks {
            let message = parse_status(homework)?;
            self.notifier.send_message(&message).await?;
            sent += 1;
        }

        Ok(CycleReport {
            homeworks: homeworks.len(),
            sent,
            current_date: current_date(&answer),
        })
    }

    /// Run one cycle and handle its outcome, without sleeping.
    ///
    /// On failure the error is logged and reported to the chat, the state
    /// becomes `ErrorBackoff` and the cursor is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the cycle's error after it has been reported.
    pub async fn tick(&mut self) -> Result<CycleReport, BotError> {
        self.state = LoopState::Polling;
        let started_at = unix_now();

        match self.run_cycle().await {
            Ok(report) => {
                if report.homeworks == 0 {
                    debug!("No status changes");
                } else {
                    info!(
                        homeworks = report.homeworks,
                        sent = report.sent,
                        "Cycle completed"
                    );
                }
                self.advance_cursor(&report, started_at);
                Ok(report)
            }
            Err(e) => {
                self.state = LoopState::ErrorBackoff;
                self.report_failure(&e).await;
                Err(e)
            }
        }
    }

    /// Poll until `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) {
        info!(
            cursor = self.cursor,
            interval_secs = self.retry_interval.as_secs(),
            mode = ?self.cursor_mode,
            "Poll loop started"
        );

        loop {
            // Outcome already logged and reported inside tick
            let _ = self.tick().await;

            tokio::select! {
                () = cancel.cancelled() => {
                    info!("Poll loop stopped");
                    break;
                }
                () = tokio::time::sleep(self.retry_interval) => {}
            }
        }
    }

    fn advance_cursor(&mut self, report: &CycleReport, started_at: i64) {
        if self.cursor_mode == CursorMode::Fixed {
            return;
        }
        let next = report.current_date.unwrap_or(started_at);
        if next > self.cursor {
            debug!(from = self.cursor, to = next, "Advancing cursor");
            self.cursor = next;
        }
    }

    async fn report_failure(&self, e: &BotError) {
        let message = failure_message(e);
        error!(kind = e.kind(), "{message}");

        // Nothing left to fall back on
        if let Err(send_err) = self.notifier.send_message(&message).await {
            error!("Failed to deliver failure notification: {send_err}");
        }
    }
}
