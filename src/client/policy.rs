use crate::config::{ClientConfig, MAX_NETWORK_RETRIES};
use crate::error::ApiError;
use crate::error_kind::ErrorKind;
use crate::Error;
use rand::Rng;
use std::time::Duration;

/// Ceiling applied to server `Retry-After` hints.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// How to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// Retry policy for one client.
///
/// - Only network failures, 5xx and 429 are retried.
/// - A `Stripe-Should-Retry: false` header vetoes any retry; `true` extends
///   retries to conflicts, never to auth, card, idempotency or validation errors.
/// - Backoff doubles per attempt, is capped, and is jittered into `[d/2, d]`.
/// - A `Retry-After` hint replaces the computed backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// `max_retries` is capped at [`MAX_NETWORK_RETRIES`].
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.min(MAX_NETWORK_RETRIES),
            initial_delay,
            max_delay: max_delay.max(initial_delay),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.max_network_retries(),
            config.initial_retry_delay(),
            config.max_retry_delay(),
        )
    }

    /// Never retry.
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// `attempt` is 0-based: the first failure is attempt 0.
    pub fn should_retry(&self, attempt: u32, err: &Error) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        match err {
            Error::Transport(e) => e.is_retryable(),
            Error::Api(api) => match api.should_retry() {
                Some(false) => false,
                Some(true) => status_retryable(api) || hint_may_retry(api),
                None => status_retryable(api),
            },
            _ => false,
        }
    }

    /// Exponential backoff before retry number `attempt + 1`, without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Delay before the next attempt; a server hint takes precedence.
    pub fn delay_before(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(hint) = retry_after {
            return hint.min(MAX_RETRY_AFTER);
        }
        let capped = self.backoff(attempt);
        if capped.is_zero() {
            return capped;
        }
        let half = capped / 2;
        let jittered = rand::thread_rng().gen_range(half..=capped);
        jittered.max(self.initial_delay)
    }

    /// Decide what to do next after an attempt failed.
    pub fn decide(&self, err: &Error, attempt: u32) -> Decision {
        if !self.should_retry(attempt, err) {
            return Decision::Fail;
        }
        let retry_after = err.as_api_error().and_then(|e| e.retry_after());
        Decision::Retry {
            delay: self.delay_before(attempt, retry_after),
        }
    }
}

fn status_retryable(api: &ApiError) -> bool {
    let status = api.http_status();
    api.kind().retryable() && (status >= 500 || status == 429)
}

/// Kinds a server `Stripe-Should-Retry: true` hint may still retry.
/// 409 covers lock timeouts on the object being modified.
fn hint_may_retry(api: &ApiError) -> bool {
    match api.kind() {
        ErrorKind::InvalidRequest => api.http_status() == 409,
        ErrorKind::Authentication
        | ErrorKind::Permission
        | ErrorKind::NotFound
        | ErrorKind::CardDeclined
        | ErrorKind::IdempotencyConflict
        | ErrorKind::Decode => false,
        ErrorKind::RateLimited | ErrorKind::Api | ErrorKind::Network => true,
    }
}
