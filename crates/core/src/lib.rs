//! Core types and traits for StockLedger
//!
//! This crate defines the foundational types used throughout the system:
//! - ProductId / ReservationId / Money: identifiers and amounts
//! - Timestamp + Clock: time representation and time source
//! - Product, Cart, CartItem, OrderItem, StockRequest: catalog and line items
//! - ProductCatalog: the catalog collaborator boundary
//! - StockError: error type hierarchy
//! - Limits: defaults and input checks

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod error;
pub mod limits;
pub mod product;
pub mod timestamp;
pub mod traits;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, StockError, StockResult};
pub use limits::{
    default_reservation_timeout, effective_threshold, effective_timeout, validate_quantity,
    DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_RESERVATION_TIMEOUT_MINUTES, DEFAULT_SWEEP_INTERVAL_SECS,
};
pub use product::{Cart, CartItem, OrderItem, Product, StockLine, StockRequest};
pub use timestamp::Timestamp;
pub use traits::ProductCatalog;
pub use types::{Money, ProductId, ReservationId};
