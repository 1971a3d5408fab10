//! Validation result objects
//!
//! Plain serializable values. Nothing here holds a reference into the ledger,
//! so results can be cached or sent over the wire freely.

use serde::{Deserialize, Serialize};
use std::fmt;

use stockledger_core::{Money, ProductId};

/// Why a single validation passed or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockReason {
    /// Enough uncommitted stock
    StockAvailable,
    /// Fewer units available than requested
    InsufficientStock,
}

impl StockReason {
    /// Wire code
    pub fn as_str(&self) -> &'static str {
        match self {
            StockReason::StockAvailable => "STOCK_AVAILABLE",
            StockReason::InsufficientStock => "INSUFFICIENT_STOCK",
        }
    }
}

impl fmt::Display for StockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one `(product, quantity)` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockValidationResult {
    /// Whether the request can be satisfied
    pub valid: bool,
    /// Requested product
    pub product_id: ProductId,
    /// Catalog title
    pub product_title: String,
    /// Units asked for
    pub requested_quantity: i64,
    /// Committed stock in the catalog
    pub actual_stock: i64,
    /// Units held by live reservations
    pub reserved_stock: i64,
    /// `actual_stock - reserved_stock`, saturating
    pub available_stock: i64,
    /// Reason code
    pub reason: StockReason,
    /// Human-readable summary
    pub message: String,
    /// `max(0, requested - available)`
    pub shortfall_quantity: i64,
}

impl StockValidationResult {
    pub(crate) fn new(
        product_id: ProductId,
        product_title: String,
        requested_quantity: i64,
        actual_stock: i64,
        reserved_stock: i64,
    ) -> Self {
        let available_stock = actual_stock.saturating_sub(reserved_stock);
        let valid = available_stock >= requested_quantity;
        let (reason, message) = if valid {
            (StockReason::StockAvailable, "Stock available".to_string())
        } else {
            (
                StockReason::InsufficientStock,
                format!(
                    "Insufficient stock. Requested: {}, Available: {}",
                    requested_quantity,
                    available_stock.max(0)
                ),
            )
        };
        Self {
            valid,
            product_id,
            product_title,
            requested_quantity,
            actual_stock,
            reserved_stock,
            available_stock,
            reason,
            message,
            shortfall_quantity: requested_quantity.saturating_sub(available_stock).max(0),
        }
    }
}

/// Outcome of validating a set of requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkStockValidationResult {
    /// Every item passed
    pub all_valid: bool,
    /// One result per item, in input order
    pub results: Vec<StockValidationResult>,
    /// The failing subset of `results`
    pub failed_results: Vec<StockValidationResult>,
    /// Number of items validated
    pub total_products: usize,
    /// Number of items that failed
    pub total_failed_products: usize,
    /// Summary line
    pub message: String,
}

impl BulkStockValidationResult {
    /// Result for an empty request set
    pub fn empty() -> Self {
        Self {
            all_valid: true,
            results: Vec::new(),
            failed_results: Vec::new(),
            total_products: 0,
            total_failed_products: 0,
            message: "No items to validate".to_string(),
        }
    }

    pub(crate) fn from_results(results: Vec<StockValidationResult>) -> Self {
        let failed_results: Vec<_> = results.iter().filter(|r| !r.valid).cloned().collect();
        let total_products = results.len();
        let total_failed_products = failed_results.len();
        let message = if total_failed_products == 0 {
            "All items passed stock validation".to_string()
        } else {
            format!(
                "{} out of {} items failed stock validation",
                total_failed_products, total_products
            )
        };
        Self {
            all_valid: total_failed_products == 0,
            results,
            failed_results,
            total_products,
            total_failed_products,
            message,
        }
    }
}

/// Bulk result for a cart plus cart-level totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartStockValidationResult {
    /// Cart that was validated
    pub cart_id: String,
    /// Per-line validation
    pub validation: BulkStockValidationResult,
    /// Sum of line quantities
    pub total_item_count: i64,
    /// Sum of unit price × quantity
    pub total_value: Money,
    /// Cart-level summary
    pub cart_message: String,
}

impl CartStockValidationResult {
    /// Every line passed
    pub fn is_valid(&self) -> bool {
        self.validation.all_valid
    }
}

/// Stock snapshot for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Product key
    pub product_id: ProductId,
    /// Catalog title, or `"Product Not Found"` for a missing product
    pub product_title: String,
    /// Committed stock in the catalog
    pub actual_stock: i64,
    /// Units held by live reservations
    pub reserved_stock: i64,
    /// Units free to reserve
    pub available_stock: i64,
    /// `available_stock > 0`
    pub in_stock: bool,
    /// `actual_stock <= low_stock_threshold`
    pub low_stock: bool,
    /// Threshold used for `low_stock`
    pub low_stock_threshold: i64,
}

/// Title used for products missing from a bulk lookup
pub const PRODUCT_NOT_FOUND_TITLE: &str = "Product Not Found";

impl StockInfo {
    /// Placeholder for a product id the catalog does not know
    pub fn not_found(product_id: ProductId, low_stock_threshold: i64) -> Self {
        Self {
            product_id,
            product_title: PRODUCT_NOT_FOUND_TITLE.to_string(),
            actual_stock: 0,
            reserved_stock: 0,
            available_stock: 0,
            in_stock: false,
            low_stock: false,
            low_stock_threshold,
        }
    }
}

/// Customer-facing summary of a bulk validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientStockNotification {
    /// Headline
    pub title: String,
    /// Summary line
    pub message: String,
    /// One line per failed product
    pub product_messages: Vec<String>,
    /// One suggestion per failed product
    pub suggested_actions: Vec<String>,
    /// False when any failed product has nothing left at all
    pub can_proceed_with_available_stock: bool,
}
