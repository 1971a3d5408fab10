//! Reserve outcomes
//!
//! A denial is an ordinary outcome, not an error. `Err` is reserved for bad
//! input, unknown products and catalog failures.

use serde::{Deserialize, Serialize};

use stockledger_core::{ProductId, ReservationId, StockLine, Timestamp};

/// Result of a single reserve call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReservationOutcome {
    /// The reservation now exists and holds stock until `expires_at`
    Granted {
        /// End of the lease
        expires_at: Timestamp,
    },
    /// Not enough uncommitted stock; the ledger is unchanged
    Denied {
        /// Units asked for
        requested: i64,
        /// Units that were free at the time of the request
        available: i64,
    },
}

impl ReservationOutcome {
    /// Whether the reservation was created
    pub fn is_granted(&self) -> bool {
        matches!(self, ReservationOutcome::Granted { .. })
    }
}

/// One line of an all-or-nothing reserve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Key for the reservation created for this line
    pub reservation_id: ReservationId,
    /// Product to claim
    pub product_id: ProductId,
    /// Units to claim
    pub quantity: i64,
}

impl ReservationRequest {
    /// Create a request line
    pub fn new(
        reservation_id: impl Into<ReservationId>,
        product_id: impl Into<ProductId>,
        quantity: i64,
    ) -> Self {
        Self {
            reservation_id: reservation_id.into(),
            product_id: product_id.into(),
            quantity,
        }
    }

    /// Build a request from any stock line, minting a fresh reservation id
    pub fn for_line(line: &impl StockLine) -> Self {
        Self {
            reservation_id: ReservationId::generate(),
            product_id: line.product_id().clone(),
            quantity: line.quantity(),
        }
    }
}

/// Result of [`reserve_all`](crate::StockReservationEngine::reserve_all)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkReservationOutcome {
    /// Every line was reserved
    Granted {
        /// Ids of the reservations created, in request order
        reservation_ids: Vec<ReservationId>,
    },
    /// A line was denied and every line granted before it was released
    Denied {
        /// Product that could not be satisfied
        product_id: ProductId,
        /// Units asked for on that line
        requested: i64,
        /// Units that were free on that line
        available: i64,
    },
}

impl BulkReservationOutcome {
    /// Whether every line was reserved
    pub fn is_granted(&self) -> bool {
        matches!(self, BulkReservationOutcome::Granted { .. })
    }
}
