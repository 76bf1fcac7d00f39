//! Fixed-backoff retry for transient network failures
//!
//! Only [`CrawlError::TransientNetwork`] is retried; status errors, missing
//! books and malformed pages are returned to the caller immediately. With
//! `max_attempts = 1` the policy still waits the backoff once before giving
//! up, which matches the "pause, then move on" behaviour of the old scraper.

use crate::config::RetryConfig;
use crate::CrawlError;
use std::future::Future;
use std::time::Duration;

/// Decision on whether to retry a failed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the delay; `attempt` is the 1-indexed attempt about to run
    Retry { delay: Duration, attempt: u32 },

    /// Give up after waiting `delay`
    GiveUp { delay: Duration },

    /// Give up immediately; the error is not transient
    DoNotRetry,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.backoff_ms))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Decides what to do after attempt number `attempt` (1-indexed) failed
    pub fn should_retry(&self, error: &CrawlError, attempt: u32) -> RetryDecision {
        if !error.is_transient() {
            return RetryDecision::DoNotRetry;
        }

        if attempt < self.max_attempts {
            RetryDecision::Retry {
                delay: self.backoff,
                attempt: attempt + 1,
            }
        } else {
            RetryDecision::GiveUp {
                delay: self.backoff,
            }
        }
    }

    /// Runs `operation` until it succeeds, fails permanently, or attempts run out
    ///
    /// `label` names the item in log lines (a page number or book ID).
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, CrawlError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CrawlError>>,
    {
        let mut attempt = 1;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            match self.should_retry(&error, attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next,
                } => {
                    tracing::warn!(
                        item = label,
                        attempt,
                        "No connection ({}), waiting {:?} before retry",
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt = next;
                }
                RetryDecision::GiveUp { delay } => {
                    tracing::warn!(
                        item = label,
                        attempt,
                        "No connection ({}), waiting {:?} then moving on",
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    return Err(error);
                }
                RetryDecision::DoNotRetry => return Err(error),
            }
        }
    }
}
