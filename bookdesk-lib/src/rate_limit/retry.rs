//! Retry policy for transient catalog failures.

use std::time::Duration;

/// A failure that may go away if the request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transient {
    /// HTTP 429. A `Retry-After` header overrides the backoff delay.
    RateLimited,
    /// HTTP 5xx.
    ServerError,
    /// Connection failures and timeouts.
    Network,
}

/// How often, and how patiently, a failed catalog request is repeated.
///
/// The wait before retry `n` (counting from zero) is `initial_delay * 2^n`,
/// capped at `max_delay`.
///
/// ```
/// use std::time::Duration;
/// use bookdesk_lib::rate_limit::{RetryConfig, Transient};
///
/// let patient = RetryConfig::default()
///     .max_retries(4)
///     .max_delay(Duration::from_secs(20));
/// assert_eq!(patient.delay_for(2), Duration::from_secs(2));
///
/// assert!(!RetryConfig::no_retry().allows(Transient::Network, 0));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    rate_limited: bool,
    server_errors: bool,
    network: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            rate_limited: true,
            server_errors: true,
            network: true,
        }
    }
}

impl RetryConfig {
    /// Every failure is returned as is.
    pub fn no_retry() -> Self {
        Self::default().max_retries(0)
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Turns retrying of one kind of failure on or off.
    pub fn retry_on(mut self, kind: Transient, enabled: bool) -> Self {
        match kind {
            Transient::RateLimited => self.rate_limited = enabled,
            Transient::ServerError => self.server_errors = enabled,
            Transient::Network => self.network = enabled,
        }
        self
    }

    /// Whether a `kind` failure gets another attempt after `retries_so_far`.
    pub fn allows(&self, kind: Transient, retries_so_far: u32) -> bool {
        let enabled = match kind {
            Transient::RateLimited => self.rate_limited,
            Transient::ServerError => self.server_errors,
            Transient::Network => self.network,
        };
        enabled && retries_so_far < self.max_retries
    }

    /// Backoff before retry number `retry` (zero-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_delay)
    }
}
