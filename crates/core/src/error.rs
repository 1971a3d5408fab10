//! Error types for StockLedger
//!
//! Every fallible operation returns [`StockResult`]. The variants map onto the
//! three caller-facing kinds (validation, not-found, inventory) plus the
//! infrastructure failures that can come out of a collaborator or a config file.
//!
//! "Not enough stock" is NOT an error. `reserve_stock` returning `false` and a
//! validation result with `valid = false` are ordinary business outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for StockLedger operations
pub type StockResult<T> = std::result::Result<T, StockError>;

/// Errors raised by the reservation and validation engines.
///
/// # Categories
///
/// | Kind | Variants | Caller action |
/// |------|----------|---------------|
/// | Validation | `InvalidInput` | Fix the request, never retried |
/// | Not Found | `ProductNotFound` | Item is no longer available |
/// | Inventory | `Inventory` | Restart the reserve flow |
/// | Catalog | `Catalog` | Collaborator I/O failed, confirm may be retried |
/// | Config | `Config` | Fix the configuration file |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum StockError {
    /// Malformed caller input
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: String,
    },

    /// Referenced product does not exist in the catalog
    #[error("product not found: {product_id}")]
    ProductNotFound {
        /// The id that was looked up
        product_id: String,
    },

    /// Confirm-time conflict: unknown/expired reservation or stock shrank
    #[error("inventory conflict: {reason}")]
    Inventory {
        /// Description of the conflict
        reason: String,
    },

    /// The product catalog failed to serve a read or write
    #[error("catalog error: {reason}")]
    Catalog {
        /// Underlying failure
        reason: String,
    },

    /// Configuration could not be read, parsed or validated
    #[error("configuration error: {reason}")]
    Config {
        /// Underlying failure
        reason: String,
    },
}

impl StockError {
    /// Build an `InvalidInput` error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        StockError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Build a `ProductNotFound` error
    pub fn product_not_found(product_id: impl fmt::Display) -> Self {
        StockError::ProductNotFound {
            product_id: product_id.to_string(),
        }
    }

    /// Build an `Inventory` error
    pub fn inventory(reason: impl Into<String>) -> Self {
        StockError::Inventory {
            reason: reason.into(),
        }
    }

    /// Build a `Catalog` error
    pub fn catalog(reason: impl Into<String>) -> Self {
        StockError::Catalog {
            reason: reason.into(),
        }
    }

    /// Build a `Config` error
    pub fn config(reason: impl Into<String>) -> Self {
        StockError::Config {
            reason: reason.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StockError::InvalidInput { .. } => ErrorKind::Validation,
            StockError::ProductNotFound { .. } => ErrorKind::NotFound,
            StockError::Inventory { .. } => ErrorKind::Inventory,
            StockError::Catalog { .. } => ErrorKind::Catalog,
            StockError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Whether restarting the operation can succeed.
    ///
    /// Inventory conflicts are worth retrying because stock levels and the
    /// ledger are live state. Catalog failures leave the reservation intact,
    /// so a confirm can simply be repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Inventory | ErrorKind::Catalog)
    }

    /// Check for the validation kind
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check for the not-found kind
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check for the inventory kind
    pub fn is_inventory(&self) -> bool {
        self.kind() == ErrorKind::Inventory
    }
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller supplied malformed input
    Validation,
    /// Product missing from the catalog
    NotFound,
    /// Confirm-time stock conflict
    Inventory,
    /// Catalog collaborator failure
    Catalog,
    /// Bad configuration
    Config,
}

impl ErrorKind {
    /// Message suitable for showing to a shopper
    pub fn user_hint(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Please check the item and quantity and try again",
            ErrorKind::NotFound => "This item is no longer available",
            ErrorKind::Inventory => "Could not complete this reservation, please try again",
            ErrorKind::Catalog => "The store is temporarily unavailable, please try again",
            ErrorKind::Config => "The store is misconfigured",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Inventory => "inventory",
            ErrorKind::Catalog => "catalog",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}
