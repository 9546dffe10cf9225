//! Monotonic timeline for the `now` arguments of the safety API.

use std::time::{Duration, Instant};

/// Converts [`Instant`]s into [`Duration`] offsets from a fixed origin.
///
/// Create one per [`SafetyLayer`][crate::SafetyLayer] and pass
/// [`MonotonicClock::now`] to every call on it, so rate limiting and
/// confirmation deadlines share a single timeline.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// A clock whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Time elapsed since the origin.
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn now_is_monotonic() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        thread::sleep(Duration::from_millis(2));
        let b = clock.now();
        assert!(b > a);
    }
}
