//! StockLedger - stock reservation and validation for storefront backends
//!
//! StockLedger keeps per-product inventory honest while many carts and
//! checkouts compete for the same units. Callers lease stock with a
//! reservation, then confirm it (the catalog is decremented) or release it.
//! Leases that are neither confirmed nor released expire on their own.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use stockledger::{InMemoryCatalog, Money, Product, StockReservationEngine};
//!
//! let catalog = Arc::new(InMemoryCatalog::with_products([
//!     Product::new("sku-1", "Desk Lamp", Money::from_minor(2499), 20),
//! ]));
//! let engine = StockReservationEngine::new(catalog.clone());
//!
//! assert!(engine.reserve_stock("sku-1", 8, "checkout-42", None)?);
//! assert_eq!(engine.get_available_stock("sku-1")?, 12);
//!
//! engine.confirm_reservation("checkout-42")?;
//! assert_eq!(catalog.stock_of(&"sku-1".into()), Some(12));
//! # Ok::<(), stockledger::StockError>(())
//! ```
//!
//! # Architecture
//!
//! - `stockledger-core`: ids, money, timestamps, clock, catalog trait, errors
//! - `stockledger-storage`: sharded reservation ledger and in-memory catalog
//! - `stockledger-engine`: reservation engine, validation engine, config,
//!   background sweeper
//!
//! Everything callers need is re-exported here.

pub use stockledger_core::{
    Cart, CartItem, Clock, ErrorKind, ManualClock, Money, OrderItem, Product, ProductCatalog,
    ProductId, ReservationId, StockError, StockLine, StockRequest, StockResult, SystemClock,
    Timestamp,
};
pub use stockledger_engine::{
    BulkReservationOutcome, BulkStockValidationResult, CartStockValidationResult, EngineConfig,
    InsufficientStockNotification, MetricsSnapshot, ReservationOutcome, ReservationRequest,
    ReservationSweeper, StockInfo, StockLevel, StockReason, StockReservationEngine,
    StockValidationEngine, StockValidationResult,
};
pub use stockledger_storage::{InMemoryCatalog, ReservationView};
