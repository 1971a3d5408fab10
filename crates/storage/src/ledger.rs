//! Sharded reservation ledger
//!
//! # Design
//!
//! - One shard per product: `DashMap<ProductId, Arc<Mutex<ProductShard>>>`
//! - Each shard owns an FxHashMap of its reservations plus an [`ExpiryIndex`]
//! - A secondary `DashMap<ReservationId, ProductId>` routes confirm/release
//!   straight to the owning shard
//!
//! # Thread Safety
//!
//! - All work on a product happens under that product's mutex, so
//!   check-then-insert is atomic per product
//! - Different products never contend on a shard mutex
//! - Lock order is always shard mutex → id index entry. No path holds an
//!   id index guard while waiting on a shard mutex.
//!
//! The ledger knows nothing about the catalog. The reservation engine runs its
//! catalog reads and writes inside [`ReservationLedger::with_product`] so they
//! are serialized with every other operation on the same product.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use stockledger_core::{ProductId, ReservationId, StockError, StockResult, Timestamp};

use crate::expiry::ExpiryIndex;
use crate::reservation::{Reservation, ReservationView};

/// All reservations held against one product
#[derive(Debug, Default)]
pub struct ProductShard {
    reservations: FxHashMap<ReservationId, Reservation>,
    expiry: ExpiryIndex,
}

impl ProductShard {
    /// Create an empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reservations stored, live or expired
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    /// Check if the shard holds nothing
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    fn insert(&mut self, reservation: Reservation) {
        self.expiry
            .insert(reservation.expires_at, reservation.reservation_id.clone());
        self.reservations
            .insert(reservation.reservation_id.clone(), reservation);
        debug_assert_eq!(self.expiry.len(), self.reservations.len());
    }

    fn remove(&mut self, id: &ReservationId) -> Option<Reservation> {
        let removed = self.reservations.remove(id)?;
        self.expiry.remove(removed.expires_at, id);
        Some(removed)
    }

    fn drain_expired(&mut self, now: Timestamp) -> Vec<Reservation> {
        let drained: Vec<Reservation> = self
            .expiry
            .drain_expired(now)
            .into_iter()
            .filter_map(|id| self.reservations.remove(&id))
            .collect();
        debug_assert_eq!(self.expiry.is_empty(), self.reservations.is_empty());
        drained
    }
}

/// Exclusive handle on one product's shard
///
/// Only obtainable inside [`ReservationLedger::with_product`], i.e. while the
/// product's mutex is held.
pub struct ProductSlot<'a> {
    product_id: &'a ProductId,
    shard: &'a mut ProductShard,
    index: &'a DashMap<ReservationId, ProductId>,
}

impl<'a> ProductSlot<'a> {
    /// Product this slot guards
    pub fn product_id(&self) -> &ProductId {
        self.product_id
    }

    /// Sum of live reservation quantities at `now`
    ///
    /// Recomputed on every call, never cached.
    pub fn claimed(&self, now: Timestamp) -> i64 {
        self.shard
            .reservations
            .values()
            .filter(|r| !r.is_expired_at(now))
            .fold(0i64, |acc, r| acc.saturating_add(r.quantity))
    }

    /// Look up a reservation in this shard regardless of expiry
    pub fn get(&self, id: &ReservationId) -> Option<&Reservation> {
        self.shard.reservations.get(id)
    }

    /// Look up a reservation that is still live at `now`
    pub fn get_live(&self, id: &ReservationId, now: Timestamp) -> Option<&Reservation> {
        self.get(id).filter(|r| !r.is_expired_at(now))
    }

    /// Whether `id` is registered anywhere in the ledger
    pub fn id_in_use(&self, id: &ReservationId) -> bool {
        self.index.contains_key(id)
    }

    /// Add a reservation to this product
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the id is already held by any reservation.
    pub fn insert(&mut self, reservation: Reservation) -> StockResult<()> {
        if reservation.product_id != *self.product_id {
            return Err(StockError::invalid_input(format!(
                "reservation {} targets product {}, not {}",
                reservation.reservation_id, reservation.product_id, self.product_id
            )));
        }
        match self.index.entry(reservation.reservation_id.clone()) {
            Entry::Occupied(_) => Err(StockError::invalid_input(format!(
                "reservation id {} is already in use",
                reservation.reservation_id
            ))),
            Entry::Vacant(vacant) => {
                vacant.insert(self.product_id.clone());
                self.shard.insert(reservation);
                Ok(())
            }
        }
    }

    /// Remove a reservation from this product and from the id index
    pub fn remove(&mut self, id: &ReservationId) -> Option<Reservation> {
        let removed = self.shard.remove(id)?;
        self.unindex(id);
        Some(removed)
    }

    /// Evict every reservation expired at `now`
    pub fn evict_expired(&mut self, now: Timestamp) -> Vec<Reservation> {
        let evicted = self.shard.drain_expired(now);
        for reservation in &evicted {
            self.unindex(&reservation.reservation_id);
        }
        evicted
    }

    /// Live reservations in this shard
    pub fn live(&self, now: Timestamp) -> impl Iterator<Item = &Reservation> {
        self.shard
            .reservations
            .values()
            .filter(move |r| !r.is_expired_at(now))
    }

    fn unindex(&self, id: &ReservationId) {
        let product_id = self.product_id;
        self.index.remove_if(id, |_, owner| owner == product_id);
    }
}

/// Shared registry of active reservations
///
/// # Example
///
/// ```ignore
/// use stockledger_storage::ReservationLedger;
///
/// let ledger = ReservationLedger::new();
/// let claimed = ledger.with_product(&product_id, |slot| slot.claimed(now));
/// ```
#[derive(Debug, Default)]
pub struct ReservationLedger {
    shards: DashMap<ProductId, Arc<Mutex<ProductShard>>>,
    index: DashMap<ReservationId, ProductId>,
}

impl ReservationLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
            index: DashMap::new(),
        }
    }

    fn shard(&self, product_id: &ProductId) -> Arc<Mutex<ProductShard>> {
        if let Some(existing) = self.shards.get(product_id) {
            return Arc::clone(existing.value());
        }
        Arc::clone(self.shards.entry(product_id.clone()).or_default().value())
    }

    /// Run `f` with exclusive access to one product's reservations
    ///
    /// Blocks only callers working on the same product.
    pub fn with_product<R>(
        &self,
        product_id: &ProductId,
        f: impl FnOnce(&mut ProductSlot<'_>) -> R,
    ) -> R {
        let shard = self.shard(product_id);
        let mut guard = shard.lock();
        let mut slot = ProductSlot {
            product_id,
            shard: &mut *guard,
            index: &self.index,
        };
        f(&mut slot)
    }

    /// Product that currently owns `id`, if any
    pub fn product_of(&self, id: &ReservationId) -> Option<ProductId> {
        self.index.get(id).map(|entry| entry.value().clone())
    }

    /// Drop `id` if it is registered but already expired at `now`
    ///
    /// Lets a caller reuse the id of a lapsed lease without waiting for the
    /// sweep. Returns the evicted reservation.
    pub fn evict_if_expired(&self, id: &ReservationId, now: Timestamp) -> Option<Reservation> {
        let product_id = self.product_of(id)?;
        self.with_product(&product_id, |slot| {
            let expired = slot.get(id).is_some_and(|r| r.is_expired_at(now));
            if expired {
                slot.remove(id)
            } else {
                None
            }
        })
    }

    /// Remove `id` wherever it lives. Missing ids are a no-op.
    pub fn remove(&self, id: &ReservationId) -> Option<Reservation> {
        let product_id = self.product_of(id)?;
        self.with_product(&product_id, |slot| slot.remove(id))
    }

    /// Evict every expired reservation across all products
    ///
    /// Shards left empty are dropped when nobody else holds them.
    pub fn evict_expired(&self, now: Timestamp) -> Vec<Reservation> {
        let mut evicted = Vec::new();
        for product_id in self.product_ids() {
            evicted.extend(self.with_product(&product_id, |slot| slot.evict_expired(now)));
            self.shards.remove_if(&product_id, |_, shard| {
                Arc::strong_count(shard) == 1 && shard.lock().is_empty()
            });
        }
        evicted
    }

    /// Every reservation live at `now`, keyed by id
    pub fn live_reservations(&self, now: Timestamp) -> BTreeMap<ReservationId, ReservationView> {
        let mut out = BTreeMap::new();
        for product_id in self.product_ids() {
            self.with_product(&product_id, |slot| {
                for r in slot.live(now) {
                    out.insert(r.reservation_id.clone(), r.view());
                }
            });
        }
        out
    }

    /// Number of reservations stored, live or not yet swept
    pub fn total_entries(&self) -> usize {
        self.index.len()
    }

    /// Number of product shards currently allocated
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn product_ids(&self) -> Vec<ProductId> {
        self.shards.iter().map(|entry| entry.key().clone()).collect()
    }
}
