//! Time sources for TTL bookkeeping.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Monotonic time source.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

/// Wall-clock time via [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Starts at the instant it was created; [`advance`](Self::advance) and
/// [`set`](Self::set) move it relative to that origin.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }

    /// Jump to `at` past the origin. Moving backwards is ignored.
    pub fn set(&self, at: Duration) {
        let mut offset = self.offset.lock();
        if at > *offset {
            *offset = at;
        }
    }

    /// Time elapsed since the origin.
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}
