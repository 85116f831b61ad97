//! Bounded polling.
//!
//! Element waits and assertions retry until their condition holds or the
//! timeout elapses, the way Cypress `should` chains behave.

use crate::result::{LoginE2eError, LoginE2eResult};
use std::future::Future;
use std::time::{Duration, Instant};

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Upper bound on the total wait
    pub timeout: Duration,
    /// Delay between attempts
    pub poll_interval: Duration,
}

impl WaitOptions {
    /// Wait up to `timeout` with the default poll interval
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Timeout in whole milliseconds, saturating
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Poll `check` until it yields `Some`.
///
/// The check runs at least once, even with a zero timeout. Errors from the
/// check abort the wait immediately.
pub async fn wait_for<T, F, Fut>(
    options: WaitOptions,
    what: &str,
    mut check: F,
) -> LoginE2eResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LoginE2eResult<Option<T>>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = check().await? {
            return Ok(value);
        }
        if start.elapsed() >= options.timeout {
            return Err(LoginE2eError::Timeout {
                what: what.to_string(),
                ms: options.timeout_ms(),
            });
        }
        tokio::time::sleep(options.poll_interval).await;
    }
}

/// Retry a user interaction while its target is missing, hidden or covered.
///
/// Matches Cypress actionability: the interaction is attempted at least once,
/// and the last [`LoginE2eError::ElementNotFound`] or
/// [`LoginE2eError::NotActionable`] is returned when the timeout elapses.
/// Any other error ends the retry immediately.
pub async fn retry_interaction<T, F, Fut>(
    options: WaitOptions,
    mut attempt: F,
) -> LoginE2eResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LoginE2eResult<T>>,
{
    let start = Instant::now();
    loop {
        match attempt().await {
            Err(e) if e.is_retryable_interaction() && start.elapsed() < options.timeout => {
                tokio::time::sleep(options.poll_interval).await;
            }
            result => return result,
        }
    }
}

/// Retry `check` until it passes; the last failure message is reported.
///
/// `check` returns `Ok(Err(message))` for a not-yet-satisfied condition.
pub async fn retry_assertion<F, Fut>(options: WaitOptions, mut check: F) -> LoginE2eResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LoginE2eResult<Result<(), String>>>,
{
    let start = Instant::now();
    loop {
        match check().await? {
            Ok(()) => return Ok(()),
            Err(message) if start.elapsed() >= options.timeout => {
                return Err(LoginE2eError::assertion(message));
            }
            Err(_) => tokio::time::sleep(options.poll_interval).await,
        }
    }
}
