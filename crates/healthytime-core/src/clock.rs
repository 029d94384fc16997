//! Wall-clock source for stop timestamps.
//!
//! Classification depends on the *local* hour, so timestamps carry their
//! offset. Tests pin the clock with [`FixedClock`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, FixedOffset, Local};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A settable clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self { at: Mutex::new(at) }
    }

    /// The stored instant is a plain value, so a poisoned lock is still usable.
    fn guard(&self) -> MutexGuard<'_, DateTime<FixedOffset>> {
        self.at.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, at: DateTime<FixedOffset>) {
        *self.guard() = at;
    }

    pub fn advance(&self, by: Duration) {
        *self.guard() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.guard()
    }
}
