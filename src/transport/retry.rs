//! Retry policy with exponential back-off
//!
//! Every request attempt that fails is classified and handed to the policy
//! together with its attempt number and HTTP status (if a response arrived);
//! the policy decides whether another attempt is made and how long to wait.

use std::{collections::HashSet, fmt, sync::Arc, time::Duration};

use crate::errors::ClientError;

/// Custom retry decision hook
///
/// Receives the classified error, the zero-based attempt number that just
/// failed, and the HTTP status code if one arrived. Returning `true` retries
/// (subject to the attempt budget).
pub type RetryPredicate = Arc<dyn Fn(&ClientError, u32, Option<u16>) -> bool + Send + Sync>;

/// Configuration of the retry behavior applied to every request
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first (minimum 1)
    pub max_attempts: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Upper bound on any single back-off delay
    pub max_delay: Duration,

    /// Multiplier applied per attempt: `base * multiplier^attempt`
    pub backoff_multiplier: f64,

    /// HTTP status codes considered transient
    pub retryable_status_codes: HashSet<u16>,

    /// Custom decision hook overriding the default classification
    pub predicate: Option<RetryPredicate>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            retryable_status_codes: [408, 429, 500, 502, 503, 504].into_iter().collect(),
            predicate: None,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("retryable_status_codes", &self.retryable_status_codes)
            .field("predicate", &self.predicate.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self { max_attempts: 1, ..Self::default() }
    }

    /// Sets the total attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the base and maximum back-off delays
    pub fn with_delays(mut self, base: Duration, max: Duration) -> Self {
        self.base_delay = base;
        self.max_delay = max;
        self
    }

    /// Installs a custom retry decision hook
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&ClientError, u32, Option<u16>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Back-off delay after the given zero-based failed attempt
    ///
    /// `min(base_delay * backoff_multiplier^attempt, max_delay)`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.min(24) as i32);
        let delay = self.base_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }

    /// Decides whether the failed attempt should be retried
    ///
    /// `attempt` is zero-based; no retry is granted once the attempt budget
    /// is exhausted regardless of classification.
    pub fn should_retry(&self, error: &ClientError, attempt: u32, status: Option<u16>) -> bool {
        if attempt + 1 >= self.max_attempts {
            return false;
        }
        if let Some(predicate) = &self.predicate {
            return predicate(error, attempt, status);
        }
        match (error, status) {
            // A response arrived: only the configured status codes are transient
            (_, Some(code)) => self.retryable_status_codes.contains(&code),
            // No response: transient unless the failure is terminal by kind
            (ClientError::Network(network), None) => network.is_retryable(),
            _ => false,
        }
    }
}
