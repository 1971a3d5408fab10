//! Storage layer for StockLedger
//!
//! This crate holds the in-memory state the engines work over:
//! - ReservationLedger: per-product sharded registry of reservations
//! - ExpiryIndex: expiry timestamp → reservation ids, for cheap sweeps
//! - Reservation / ReservationView: the stored record and its caller-facing copy
//! - InMemoryCatalog: DashMap-backed product catalog
//!
//! # Concurrency
//!
//! - Per-product shards: reservations on different products never contend
//! - Check-then-insert runs under the product's mutex
//! - Expiry is a predicate evaluated on every read, sweeps only reclaim memory

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod expiry;
pub mod ledger;
pub mod reservation;

pub use catalog::InMemoryCatalog;
pub use expiry::ExpiryIndex;
pub use ledger::{ProductShard, ProductSlot, ReservationLedger};
pub use reservation::{Reservation, ReservationView};
