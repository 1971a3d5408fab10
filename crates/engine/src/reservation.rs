//! Stock reservation engine
//!
//! Leases units of a product to a caller-supplied reservation id for a bounded
//! time. A lease is either confirmed (stock is written back to the catalog),
//! released, or left to expire.
//!
//! # Invariants
//!
//! - `available = actual - claimed`, recomputed against the catalog on every
//!   call. Claimed totals are never cached.
//! - A reserve never leaves `claimed > actual` for the product at the moment it
//!   is granted. The catalog read, the claimed sum and the insert all run under
//!   the product's ledger lock.
//! - Confirm writes to the catalog before removing the reservation. A failed
//!   write leaves the reservation live so the confirm can be retried.
//! - Expiry is checked on every read. `cleanup_expired_reservations` only
//!   reclaims memory.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use stockledger_core::{
    effective_timeout, validate_quantity, Clock, Product, ProductCatalog, ProductId,
    ReservationId, StockError, StockResult, SystemClock, Timestamp,
};
use stockledger_storage::{Reservation, ReservationLedger, ReservationView};

use crate::config::EngineConfig;
use crate::metrics::{MetricsSnapshot, ReservationMetrics};
use crate::outcome::{BulkReservationOutcome, ReservationOutcome, ReservationRequest};

/// Consistent stock figures for one product
///
/// Actual and reserved are read under the same product lock, so
/// `available == actual - reserved` always holds for a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Catalog record at the time of the read
    pub product: Product,
    /// Sum of live reservations
    pub reserved: i64,
}

impl StockLevel {
    /// Committed stock in the catalog
    pub fn actual(&self) -> i64 {
        self.product.stock
    }

    /// Stock not claimed by a live reservation. May be negative after an
    /// external stock decrease.
    pub fn available(&self) -> i64 {
        self.product.stock.saturating_sub(self.reserved)
    }
}

/// Reserve / confirm / release over a product catalog
///
/// Thread-safe: share it behind an `Arc` and call it from any number of
/// threads. Calls on the same product are serialized, calls on different
/// products run in parallel.
pub struct StockReservationEngine {
    catalog: Arc<dyn ProductCatalog>,
    ledger: ReservationLedger,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    metrics: ReservationMetrics,
}

impl std::fmt::Debug for StockReservationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockReservationEngine")
            .field("ledger", &self.ledger)
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl StockReservationEngine {
    /// Create an engine with the default configuration and the system clock
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            ledger: ReservationLedger::new(),
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
            metrics: ReservationMetrics::new(),
        }
    }

    /// Create an engine with an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `Config` if the configuration fails validation.
    pub fn with_config(catalog: Arc<dyn ProductCatalog>, config: EngineConfig) -> StockResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(catalog)
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current time as seen by the engine
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ========================================================================
    // Reserve
    // ========================================================================

    /// Try to lease `quantity` units of `product_id` to `reservation_id`
    ///
    /// Returns `Ok(false)` when there is not enough uncommitted stock; that is
    /// not an error. A `None` or zero timeout uses the configured default.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for blank ids, a non-positive quantity, or an id that
    ///   already holds a live reservation
    /// - `ProductNotFound` if the catalog does not know the product
    /// - `Catalog` if the catalog read fails
    pub fn reserve_stock(
        &self,
        product_id: &str,
        quantity: i64,
        reservation_id: &str,
        timeout: Option<Duration>,
    ) -> StockResult<bool> {
        self.reserve_stock_detailed(product_id, quantity, reservation_id, timeout)
            .map(|outcome| outcome.is_granted())
    }

    /// Same as [`reserve_stock`](Self::reserve_stock), reporting the lease end
    /// on success and the free quantity on denial
    pub fn reserve_stock_detailed(
        &self,
        product_id: &str,
        quantity: i64,
        reservation_id: &str,
        timeout: Option<Duration>,
    ) -> StockResult<ReservationOutcome> {
        let product_id = ProductId::validated(product_id)?;
        let reservation_id = ReservationId::validated(reservation_id)?;
        validate_quantity(quantity)?;
        let ttl = effective_timeout(timeout, self.config.default_reservation_timeout());

        self.reserve_checked(&product_id, quantity, reservation_id, ttl)
    }

    /// Reserve every line or none of them
    ///
    /// All lines are checked before anything is reserved. If a line is denied
    /// or fails, the lines already granted by this call are released.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed line or a reservation id repeated
    ///   within `requests`
    /// - any error a single reserve can return, after rolling back
    pub fn reserve_all(
        &self,
        requests: &[ReservationRequest],
        timeout: Option<Duration>,
    ) -> StockResult<BulkReservationOutcome> {
        let mut seen = HashSet::with_capacity(requests.len());
        for request in requests {
            ProductId::validated(request.product_id.as_str())?;
            ReservationId::validated(request.reservation_id.as_str())?;
            validate_quantity(request.quantity)?;
            if !seen.insert(&request.reservation_id) {
                return Err(StockError::invalid_input(format!(
                    "reservation id {} appears more than once",
                    request.reservation_id
                )));
            }
        }

        let ttl = effective_timeout(timeout, self.config.default_reservation_timeout());
        let mut granted: Vec<ReservationId> = Vec::with_capacity(requests.len());

        for request in requests {
            let outcome = self.reserve_checked(
                &request.product_id,
                request.quantity,
                request.reservation_id.clone(),
                ttl,
            );
            match outcome {
                Ok(ReservationOutcome::Granted { .. }) => {
                    granted.push(request.reservation_id.clone());
                }
                Ok(ReservationOutcome::Denied {
                    requested,
                    available,
                }) => {
                    self.roll_back(&granted);
                    return Ok(BulkReservationOutcome::Denied {
                        product_id: request.product_id.clone(),
                        requested,
                        available,
                    });
                }
                Err(e) => {
                    self.roll_back(&granted);
                    return Err(e);
                }
            }
        }

        Ok(BulkReservationOutcome::Granted {
            reservation_ids: granted,
        })
    }

    fn reserve_checked(
        &self,
        product_id: &ProductId,
        quantity: i64,
        reservation_id: ReservationId,
        ttl: Duration,
    ) -> StockResult<ReservationOutcome> {
        // A lapsed lease must not block reuse of its id
        if self
            .ledger
            .evict_if_expired(&reservation_id, self.clock.now())
            .is_some()
        {
            self.metrics.record_expired(1);
        }

        let outcome = self.ledger.with_product(product_id, |slot| {
            if slot.id_in_use(&reservation_id) {
                return Err(StockError::invalid_input(format!(
                    "reservation id {} is already in use",
                    reservation_id
                )));
            }

            let product = self.load_product(product_id)?;
            let now = self.clock.now();
            let available = product.stock.saturating_sub(slot.claimed(now));
            if available < quantity {
                return Ok(ReservationOutcome::Denied {
                    requested: quantity,
                    available,
                });
            }

            let reservation =
                Reservation::new(reservation_id.clone(), product_id.clone(), quantity, now, ttl);
            let expires_at = reservation.expires_at;
            slot.insert(reservation)?;
            Ok(ReservationOutcome::Granted { expires_at })
        })?;

        match outcome {
            ReservationOutcome::Granted { expires_at } => {
                self.metrics.record_granted();
                debug!(
                    target: "stockledger::reservation",
                    reservation_id = %reservation_id,
                    product_id = %product_id,
                    quantity,
                    expires_at = %expires_at,
                    "Reservation granted"
                );
            }
            ReservationOutcome::Denied { available, .. } => {
                self.metrics.record_denied();
                debug!(
                    target: "stockledger::reservation",
                    reservation_id = %reservation_id,
                    product_id = %product_id,
                    quantity,
                    available,
                    "Reservation denied: insufficient stock"
                );
            }
        }
        Ok(outcome)
    }

    fn roll_back(&self, granted: &[ReservationId]) {
        for id in granted {
            if self.ledger.remove(id).is_some() {
                self.metrics.record_released();
            }
        }
        if !granted.is_empty() {
            debug!(
                target: "stockledger::reservation",
                count = granted.len(),
                "Rolled back partial bulk reservation"
            );
        }
    }

    // ========================================================================
    // Confirm / release
    // ========================================================================

    /// Make a reservation permanent
    ///
    /// Writes `actual - quantity` to the catalog, then removes the
    /// reservation.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank id
    /// - `Inventory` if the id is unknown or expired, or the catalog now holds
    ///   fewer units than were reserved. The reservation is left untouched.
    /// - `ProductNotFound` / `Catalog` from the catalog. The reservation stays
    ///   live and the confirm can be retried.
    pub fn confirm_reservation(&self, reservation_id: &str) -> StockResult<()> {
        let reservation_id = ReservationId::validated(reservation_id)?;
        let product_id = self
            .ledger
            .product_of(&reservation_id)
            .ok_or_else(|| unknown_reservation(&reservation_id))?;

        let (quantity, remaining) = self.ledger.with_product(&product_id, |slot| {
            let now = self.clock.now();
            let quantity = slot
                .get_live(&reservation_id, now)
                .map(|r| r.quantity)
                .ok_or_else(|| unknown_reservation(&reservation_id))?;

            let product = self.load_product(&product_id)?;
            if product.stock < quantity {
                warn!(
                    target: "stockledger::reservation",
                    reservation_id = %reservation_id,
                    product_id = %product_id,
                    reserved = quantity,
                    actual = product.stock,
                    "Confirm conflict: stock fell below reserved quantity"
                );
                return Err(StockError::inventory(format!(
                    "cannot confirm reservation {}: {} reserved but only {} in stock",
                    reservation_id, quantity, product.stock
                )));
            }

            let remaining = product.stock - quantity;
            if let Err(e) = self.catalog.update_stock(&product_id, remaining) {
                warn!(
                    target: "stockledger::reservation",
                    reservation_id = %reservation_id,
                    product_id = %product_id,
                    error = %e,
                    "Catalog write failed, reservation kept"
                );
                return Err(e);
            }
            slot.remove(&reservation_id);
            Ok((quantity, remaining))
        })?;

        self.metrics.record_confirmed();
        info!(
            target: "stockledger::reservation",
            reservation_id = %reservation_id,
            product_id = %product_id,
            quantity,
            remaining,
            "Reservation confirmed"
        );
        Ok(())
    }

    /// Give reserved units back
    ///
    /// Never fails. Blank or unknown ids are a no-op, so releasing twice is
    /// harmless.
    pub fn release_reservation(&self, reservation_id: &str) {
        if reservation_id.trim().is_empty() {
            return;
        }
        let id = ReservationId::new(reservation_id);
        if let Some(released) = self.ledger.remove(&id) {
            self.metrics.record_released();
            debug!(
                target: "stockledger::reservation",
                reservation_id = %id,
                product_id = %released.product_id,
                quantity = released.quantity,
                "Reservation released"
            );
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether `quantity` more units could be reserved right now
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank id or non-positive quantity,
    /// `ProductNotFound` for an unknown product.
    pub fn is_stock_available(&self, product_id: &str, quantity: i64) -> StockResult<bool> {
        validate_quantity(quantity)?;
        Ok(self.stock_level(product_id)?.available() >= quantity)
    }

    /// Units not held by a live reservation
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank id, `ProductNotFound` for an unknown product.
    pub fn get_available_stock(&self, product_id: &str) -> StockResult<i64> {
        Ok(self.stock_level(product_id)?.available())
    }

    /// Units held by live reservations
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank id, `ProductNotFound` for an unknown product.
    pub fn get_reserved_stock(&self, product_id: &str) -> StockResult<i64> {
        Ok(self.stock_level(product_id)?.reserved)
    }

    /// Actual, reserved and available stock from one consistent read
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank id, `ProductNotFound` for an unknown product.
    pub fn stock_level(&self, product_id: &str) -> StockResult<StockLevel> {
        let product_id = ProductId::validated(product_id)?;
        self.stock_level_of(&product_id)
    }

    pub(crate) fn stock_level_of(&self, product_id: &ProductId) -> StockResult<StockLevel> {
        self.ledger.with_product(product_id, |slot| {
            let product = self.load_product(product_id)?;
            let reserved = slot.claimed(self.clock.now());
            Ok(StockLevel { product, reserved })
        })
    }

    /// Live reservation with this id, if any
    pub fn get_reservation(&self, reservation_id: &str) -> Option<ReservationView> {
        let id = ReservationId::new(reservation_id);
        let product_id = self.ledger.product_of(&id)?;
        self.ledger.with_product(&product_id, |slot| {
            slot.get_live(&id, self.clock.now()).map(Reservation::view)
        })
    }

    /// Every live reservation, keyed by id
    pub fn get_active_reservations(&self) -> BTreeMap<ReservationId, ReservationView> {
        self.ledger.live_reservations(self.clock.now())
    }

    /// Evict expired reservations, returning how many were removed
    ///
    /// Idempotent. Reads already ignore expired reservations, so skipping a
    /// sweep only costs memory.
    pub fn cleanup_expired_reservations(&self) -> usize {
        let evicted = self.ledger.evict_expired(self.clock.now());
        let count = evicted.len();
        if count > 0 {
            self.metrics.record_expired(count);
            info!(
                target: "stockledger::reservation",
                count,
                "Evicted expired reservations"
            );
        }
        count
    }

    /// Lifecycle counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Reservations held in memory, including expired ones not yet swept
    pub fn ledger_len(&self) -> usize {
        self.ledger.total_entries()
    }

    fn load_product(&self, product_id: &ProductId) -> StockResult<Product> {
        self.catalog
            .get_by_id(product_id)?
            .ok_or_else(|| StockError::product_not_found(product_id))
    }
}

fn unknown_reservation(id: &ReservationId) -> StockError {
    StockError::inventory(format!("reservation {} not found or expired", id))
}
