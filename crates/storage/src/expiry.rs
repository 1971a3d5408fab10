//! Expiry index for reservation sweeps
//!
//! Maps `expires_at → {reservation ids}` in a BTreeMap so a sweep only visits
//! the reservations that have actually expired:
//! - `drain_expired(now)` is O(expired count), not O(ledger size)
//! - Expired means `expires_at < now`, matching `Reservation::is_expired_at`

use std::collections::{BTreeMap, HashSet};

use stockledger_core::{ReservationId, Timestamp};

/// Expiry timestamp → reservation ids expiring at that instant
#[derive(Debug, Default)]
pub struct ExpiryIndex {
    index: BTreeMap<Timestamp, HashSet<ReservationId>>,
}

impl ExpiryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            index: BTreeMap::new(),
        }
    }

    /// Track `id` as expiring at `expires_at`
    pub fn insert(&mut self, expires_at: Timestamp, id: ReservationId) {
        self.index.entry(expires_at).or_default().insert(id);
    }

    /// Stop tracking `id`
    ///
    /// Drops the timestamp bucket once it is empty.
    pub fn remove(&mut self, expires_at: Timestamp, id: &ReservationId) {
        if let Some(ids) = self.index.get_mut(&expires_at) {
            ids.remove(id);
            if ids.is_empty() {
                self.index.remove(&expires_at);
            }
        }
    }

    /// Remove every bucket strictly before `now`, returning the ids removed
    pub fn drain_expired(&mut self, now: Timestamp) -> Vec<ReservationId> {
        let live = self.index.split_off(&now);
        let expired = std::mem::replace(&mut self.index, live);
        expired.into_values().flatten().collect()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total number of tracked ids
    pub fn len(&self) -> usize {
        self.index.values().map(|ids| ids.len()).sum()
    }
}
