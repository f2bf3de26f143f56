//! Retry with exponential backoff on rate-limit failures.
//!
//! Blocking: the calling thread sleeps between attempts. Only errors for
//! which [`AiError::is_rate_limited`] is true are retried; everything else
//! propagates on first occurrence.

use std::time::Duration;

use tracing::{debug, warn};

use crate::AiError;

/// Retry configuration, fixed for the lifetime of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first call, so it must be at least 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self, AiError> {
        if max_attempts == 0 {
            return Err(AiError::Config("max_attempts must be at least 1".into()));
        }
        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay before retry number `retry` (zero-based): `base_delay * 2^retry`.
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Suspends the caller between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Run `operation`, retrying rate-limited failures per `policy`.
///
/// After `max_attempts` rate-limited failures the last error is returned.
pub fn with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> Result<T, AiError>
where
    F: FnMut() -> Result<T, AiError>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limited() && attempt < policy.max_attempts => {
                let delay = policy.delay_for_attempt(attempt - 1);
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    ?delay,
                    error = %e,
                    "rate limited, backing off"
                );
                sleeper.sleep(delay);
            }
            Err(e) => {
                debug!(attempt, error = %e, "giving up");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::Sleeper;

    /// Records requested sleeps instead of sleeping.
    #[derive(Default)]
    pub(crate) struct RecordingSleeper {
        pub(crate) sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub(crate) fn recorded(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }
}
