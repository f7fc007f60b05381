//! Time source for annotation timestamps.

use chrono::Utc;
use std::cell::Cell;

/// Supplies "now" as Unix epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock that starts at `start_ms` and advances by `step_ms`
/// on every read. A zero step freezes time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    next_ms: Cell<i64>,
    step_ms: i64,
}

impl ManualClock {
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self {
            next_ms: Cell::new(start_ms),
            step_ms,
        }
    }

    pub fn frozen(at_ms: i64) -> Self {
        Self::new(at_ms, 0)
    }

    /// Moves the next reading to `at_ms`.
    pub fn set(&self, at_ms: i64) {
        self.next_ms.set(at_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        let now = self.next_ms.get();
        self.next_ms.set(now.saturating_add(self.step_ms));
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}
