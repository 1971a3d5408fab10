//! Reservation lifecycle counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the reservation engine
///
/// # Memory Ordering
///
/// All counters use Relaxed ordering. They are observational only and never
/// synchronize other memory, so a snapshot taken under load may be slightly
/// behind the ledger.
#[derive(Debug, Default)]
pub struct ReservationMetrics {
    granted: AtomicU64,
    denied: AtomicU64,
    confirmed: AtomicU64,
    released: AtomicU64,
    expired: AtomicU64,
}

impl ReservationMetrics {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_granted(&self) {
        self.granted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_denied(&self) {
        self.denied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_confirmed(&self) {
        self.confirmed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_released(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expired(&self, count: usize) {
        self.expired.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            granted: self.granted.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            confirmed: self.confirmed.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
        }
    }
}

/// Reservation metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Reserve calls that created a reservation
    pub granted: u64,
    /// Reserve calls turned away for insufficient stock
    pub denied: u64,
    /// Reservations committed to the catalog
    pub confirmed: u64,
    /// Reservations removed by an explicit release
    pub released: u64,
    /// Reservations evicted by a cleanup sweep
    pub expired: u64,
}

impl MetricsSnapshot {
    /// Reservations that have left the ledger by any path
    pub fn total_closed(&self) -> u64 {
        self.confirmed + self.released + self.expired
    }

    /// Denied / (granted + denied)
    pub fn denial_rate(&self) -> f64 {
        let attempts = self.granted + self.denied;
        if attempts > 0 {
            self.denied as f64 / attempts as f64
        } else {
            0.0
        }
    }
}
