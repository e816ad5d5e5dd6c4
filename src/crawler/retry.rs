//! Bounded retry decisions
//!
//! `RetryPolicy` is pure: it looks at a failed `PageRequest` and says whether
//! to issue it again. The walker performs the wait and the request.

use crate::config::RetryConfig;
use crate::crawler::PageRequest;
use std::time::Duration;

/// Outcome of a retry decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Request the same page again
    Retry(PageRequest),

    /// The page has used its whole retry budget
    Exhausted {
        page_number: u32,
        /// Requests issued for the page, including the first
        attempts: u32,
    },
}

/// Retry ceiling and pacing for failed page requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, Duration::from_millis(config.delay_ms))
    }

    /// Decides what to do after `request` failed
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_walker::crawler::{PageRequest, RetryDecision, RetryPolicy};
    /// use std::time::Duration;
    /// use url::Url;
    ///
    /// let policy = RetryPolicy::new(3, Duration::ZERO);
    /// let request = PageRequest::new(Url::parse("https://example.com/?page=1").unwrap(), 1);
    ///
    /// match policy.decide(&request) {
    ///     RetryDecision::Retry(next) => assert_eq!(next.retry_count, 1),
    ///     RetryDecision::Exhausted { .. } => unreachable!(),
    /// }
    /// ```
    pub fn decide(&self, request: &PageRequest) -> RetryDecision {
        if request.retry_count < self.max_retries {
            RetryDecision::Retry(request.retry())
        } else {
            RetryDecision::Exhausted {
                page_number: request.page_number,
                attempts: request.retry_count + 1,
            }
        }
    }

    /// Retries allowed after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Pause before each retry
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
