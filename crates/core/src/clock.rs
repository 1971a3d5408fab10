//! Time source abstraction
//!
//! The engine reads "now" only through a [`Clock`], so reservation expiry can be
//! driven deterministically in tests with [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::timestamp::Timestamp;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> Timestamp;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock that only moves when told to
///
/// Shared between threads by reference; `advance` is visible to every reader.
#[derive(Debug)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    /// Start at the given time
    pub fn new(start: Timestamp) -> Self {
        Self {
            micros: AtomicU64::new(start.as_micros()),
        }
    }

    /// Move forward by `by`
    pub fn advance(&self, by: Duration) {
        let delta = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        let _ = self
            .micros
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |m| {
                Some(m.saturating_add(delta))
            });
    }

    /// Jump to an absolute time
    pub fn set(&self, to: Timestamp) {
        self.micros.store(to.as_micros(), Ordering::Release);
    }
}

impl Default for ManualClock {
    /// Starts at 2025-01-01T00:00:00Z
    fn default() -> Self {
        Self::new(Timestamp::from_secs(1_735_689_600))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.micros.load(Ordering::Acquire))
    }
}
