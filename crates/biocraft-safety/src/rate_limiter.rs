//! [`RateLimiter`] – minimum spacing between accepted commands.
//!
//! Timestamps are [`Duration`] offsets on a single monotonic timeline chosen
//! by the caller (see [`MonotonicClock`][crate::clock::MonotonicClock]).
//! The read-check-update in [`RateLimiter::allow`] happens under one lock, so
//! two concurrent callers can never both be admitted inside one interval.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use biocraft_types::CraftError;
use tracing::debug;

/// Enforces a minimum elapsed time between accepted commands.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use biocraft_safety::rate_limiter::RateLimiter;
///
/// let limiter = RateLimiter::new(Duration::from_millis(10));
/// assert!(limiter.allow(Duration::ZERO).is_ok());
/// assert!(limiter.allow(Duration::from_millis(5)).is_err());
/// assert!(limiter.allow(Duration::from_millis(10)).is_ok());
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_accepted: Mutex<Option<Duration>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Timestamp of the most recently accepted command, if any.
    pub fn last_accepted(&self) -> Option<Duration> {
        *self.last_accepted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit a command at `now`, or report how long until one would be.
    ///
    /// On success `now` becomes the last accepted timestamp.  On rejection the
    /// state is unchanged.  A `now` earlier than the last accepted timestamp
    /// counts as zero elapsed time.
    ///
    /// # Errors
    ///
    /// [`CraftError::RateLimited`] with
    /// `retry_after = interval - (now - last_accepted)`.
    pub fn allow(&self, now: Duration) -> Result<(), CraftError> {
        let mut last = self
            .last_accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(prev) = *last {
            let elapsed = now.saturating_sub(prev);
            if elapsed < self.interval {
                let retry_after = self.interval - elapsed;
                debug!(?now, ?prev, ?retry_after, "rate limited");
                return Err(CraftError::RateLimited { retry_after });
            }
        }

        *last = Some(now);
        Ok(())
    }
}
