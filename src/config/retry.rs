//! Retry policy and backoff computation for the SocketLabs client.

use rand::Rng;
use std::time::Duration;

use super::error::ConfigError;

/// Largest retry count a policy accepts.
pub const MAX_RETRIES_LIMIT: u32 = 5;

/// Bounds of the jittered backoff unit, in milliseconds.
const JITTER_UNIT_MS: std::ops::Range<u64> = 800..1200;
const UNIT_MS: u64 = 1000;

/// Configuration for retry behavior.
///
/// Built through [`RetryPolicy::new`], which enforces the retry limit. The wait before retry `n` (1-indexed) is
/// `min(max_backoff, min_backoff + (backoff_factor^n - 1) * unit)`, where the
/// unit is one second, or a value drawn from `[800ms, 1200ms)` per retry when
/// jitter is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    max_retries: u32,

    /// Base wait added to every backoff.
    min_backoff: Duration,

    /// Upper bound on any single wait.
    max_backoff: Duration,

    /// Exponential growth factor.
    backoff_factor: f64,

    /// Whether to draw the backoff unit at random.
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default backoff parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `max_retries` exceeds
    /// [`MAX_RETRIES_LIMIT`].
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_socketlabs::config::RetryPolicy;
    ///
    /// assert!(RetryPolicy::new(2).is_ok());
    /// assert!(RetryPolicy::new(6).is_err());
    /// ```
    pub fn new(max_retries: u32) -> Result<Self, ConfigError> {
        if max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::invalid(format!(
                "max_retries must be between 0 and {}, got {}",
                MAX_RETRIES_LIMIT, max_retries
            )));
        }

        Ok(Self {
            max_retries,
            ..Self::default()
        })
    }

    /// Maximum number of retries after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Base wait added to every backoff.
    pub fn min_backoff(&self) -> Duration {
        self.min_backoff
    }

    /// Upper bound on any single wait.
    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// Exponential growth factor.
    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    /// Whether the backoff unit is drawn at random.
    pub fn jitter(&self) -> bool {
        self.jitter
    }

    /// Disable jitter so waits are deterministic.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Total attempts a send may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait before the given retry (1-indexed).
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use integrations_socketlabs::config::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(3).unwrap().without_jitter();
    /// assert_eq!(policy.next_wait_interval(1), Duration::from_secs(2));
    /// assert_eq!(policy.next_wait_interval(2), Duration::from_secs(4));
    /// assert_eq!(policy.next_wait_interval(4), Duration::from_secs(10));
    /// ```
    pub fn next_wait_interval(&self, retry_number: u32) -> Duration {
        let unit_ms = if self.jitter {
            rand::thread_rng().gen_range(JITTER_UNIT_MS)
        } else {
            UNIT_MS
        };

        let growth = self.backoff_factor.powi(retry_number as i32) - 1.0;
        let wait = self
            .min_backoff
            .saturating_add(Duration::from_millis((growth * unit_ms as f64) as u64));

        wait.min(self.max_backoff)
    }
}
