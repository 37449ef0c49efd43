//! Rate-limit retry policy.
//!
//! The Web API signals "come back later" with 429 Too Many Requests and, for
//! some resources, with a bodiless 202 Accepted. Both may carry a
//! `Retry-After` header in seconds. Every other failure is terminal.

use std::time::Duration;

use reqwest::{
    StatusCode,
    header::{HeaderMap, RETRY_AFTER},
};

use crate::config::ClientConfig;

/// Wait used when the service does not say how long to back off.
pub const DEFAULT_RETRY_DURATION: Duration = Duration::from_secs(5);

/// Whether `status` is a transient condition worth waiting out.
pub fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::ACCEPTED || status == StatusCode::TOO_MANY_REQUESTS
}

/// How long to wait before re-issuing a request answered with `headers`.
pub fn retry_duration(headers: &HeaderMap) -> Duration {
    retry_after_secs(headers)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_DURATION)
}

pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Outcome of consulting the policy for one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Auto-retry is off; classify the response as if no policy existed.
    Disabled,
    /// Give up and report the response as a service error.
    Terminal,
    /// Sleep for the given duration, then re-issue the request.
    Wait(Duration),
}

/// The retry settings of one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub enabled: bool,
    pub max_wait: Option<Duration>,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            enabled: config.auto_retry,
            max_wait: config.max_retry_duration,
            max_attempts: config.max_retry_attempts,
        }
    }

    /// Decides what to do with a response, given how many retries this call
    /// has already spent.
    pub fn decide(&self, status: StatusCode, headers: &HeaderMap, retries: u32) -> RetryDecision {
        if !self.enabled {
            return RetryDecision::Disabled;
        }
        if !should_retry(status) {
            return RetryDecision::Terminal;
        }

        let wait = retry_duration(headers);
        if self.max_wait.is_some_and(|max| wait > max) {
            return RetryDecision::Terminal;
        }
        if retries >= self.max_attempts {
            return RetryDecision::Terminal;
        }

        RetryDecision::Wait(wait)
    }
}
