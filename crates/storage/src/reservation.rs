//! Reservation record held by the ledger

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use stockledger_core::{ProductId, ReservationId, Timestamp};

/// One provisional claim on a product's stock
///
/// Owned by the ledger. Callers only ever see copies ([`ReservationView`]) or
/// the id string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Caller-supplied key
    pub reservation_id: ReservationId,
    /// Product being claimed
    pub product_id: ProductId,
    /// Units claimed, always positive
    pub quantity: i64,
    /// When the claim was granted
    pub created_at: Timestamp,
    /// Absolute end of the lease
    pub expires_at: Timestamp,
}

impl Reservation {
    /// Create a reservation leased for `ttl` from `now`
    pub fn new(
        reservation_id: ReservationId,
        product_id: ProductId,
        quantity: i64,
        now: Timestamp,
        ttl: Duration,
    ) -> Self {
        Self {
            reservation_id,
            product_id,
            quantity,
            created_at: now,
            expires_at: now.saturating_add(ttl),
        }
    }

    /// Expired once `now` is strictly past `expires_at`
    #[inline]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.is_after(self.expires_at)
    }

    /// Read-only copy for callers
    pub fn view(&self) -> ReservationView {
        ReservationView {
            product_id: self.product_id.clone(),
            quantity: self.quantity,
            expires_at: self.expires_at,
        }
    }
}

/// Snapshot of a live reservation as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationView {
    /// Product being claimed
    pub product_id: ProductId,
    /// Units claimed
    pub quantity: i64,
    /// End of the lease
    pub expires_at: Timestamp,
}

impl fmt::Display for ReservationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product: {}, Quantity: {}", self.product_id, self.quantity)
    }
}
