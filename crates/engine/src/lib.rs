//! Reservation and validation engine for StockLedger
//!
//! This crate sits on top of the storage layer:
//! - StockReservationEngine: reserve, confirm, release, availability queries
//! - StockValidationEngine: single, bulk, cart and order stock checks
//! - EngineConfig: `stockledger.toml` loading and defaults
//! - ReservationSweeper: optional background expiry sweep
//!
//! The engine is the only component that talks to the product catalog.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod metrics;
pub mod notification;
pub mod outcome;
pub mod reservation;
pub mod result;
pub mod sweeper;
pub mod validation;

pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use metrics::{MetricsSnapshot, ReservationMetrics};
pub use notification::insufficient_stock_notification;
pub use outcome::{BulkReservationOutcome, ReservationOutcome, ReservationRequest};
pub use reservation::{StockLevel, StockReservationEngine};
pub use result::{
    BulkStockValidationResult, CartStockValidationResult, InsufficientStockNotification,
    StockInfo, StockReason, StockValidationResult, PRODUCT_NOT_FOUND_TITLE,
};
pub use sweeper::ReservationSweeper;
pub use validation::StockValidationEngine;
