//! Stock validation engine
//!
//! Answers "can this be satisfied right now" for single items, bulk sets,
//! carts and orders. It holds no state of its own: every answer is computed
//! from the catalog and the reservation engine at call time, and nothing here
//! reserves stock.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use stockledger_core::{
    effective_threshold, validate_quantity, Cart, OrderItem, ProductId, StockLine, StockResult,
    StockError,
};

use crate::notification::insufficient_stock_notification;
use crate::reservation::{StockLevel, StockReservationEngine};
use crate::result::{
    BulkStockValidationResult, CartStockValidationResult, InsufficientStockNotification,
    StockInfo, StockValidationResult,
};

/// Read-only stock checks over a [`StockReservationEngine`]
#[derive(Debug, Clone)]
pub struct StockValidationEngine {
    reservations: Arc<StockReservationEngine>,
}

impl StockValidationEngine {
    /// Create a validation engine sharing `reservations`
    pub fn new(reservations: Arc<StockReservationEngine>) -> Self {
        Self { reservations }
    }

    /// Reservation engine backing this validator
    pub fn reservations(&self) -> &Arc<StockReservationEngine> {
        &self.reservations
    }

    /// Check one `(product, quantity)` request
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank id or non-positive quantity,
    /// `ProductNotFound` for an unknown product.
    pub fn validate_product_stock(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> StockResult<StockValidationResult> {
        self.validate_line(&ProductId::new(product_id), quantity)
    }

    fn validate_line(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> StockResult<StockValidationResult> {
        ProductId::validated(product_id.as_str())?;
        validate_quantity(quantity)?;

        let level = self.reservations.stock_level_of(product_id)?;
        let result = StockValidationResult::new(
            product_id.clone(),
            level.product.title.clone(),
            quantity,
            level.actual(),
            level.reserved,
        );
        debug!(
            target: "stockledger::validation",
            product_id = %product_id,
            requested = quantity,
            available = result.available_stock,
            valid = result.valid,
            "Validated stock"
        );
        Ok(result)
    }

    /// Check every line in `items`
    ///
    /// An empty slice is valid and touches neither the catalog nor the
    /// ledger.
    ///
    /// # Errors
    ///
    /// The first per-line error, if any line is malformed or names an
    /// unknown product.
    pub fn validate_bulk_stock<L: StockLine>(
        &self,
        items: &[L],
    ) -> StockResult<BulkStockValidationResult> {
        if items.is_empty() {
            return Ok(BulkStockValidationResult::empty());
        }

        let results = items
            .iter()
            .map(|item| self.validate_line(item.product_id(), item.quantity()))
            .collect::<StockResult<Vec<_>>>()?;
        let bulk = BulkStockValidationResult::from_results(results);

        debug!(
            target: "stockledger::validation",
            total = bulk.total_products,
            failed = bulk.total_failed_products,
            "Validated bulk stock"
        );
        Ok(bulk)
    }

    /// Check a cart and attach its totals
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `cart` is `None`, otherwise as
    /// [`validate_bulk_stock`](Self::validate_bulk_stock).
    pub fn validate_cart_stock(
        &self,
        cart: Option<&Cart>,
    ) -> StockResult<CartStockValidationResult> {
        let cart = cart.ok_or_else(|| StockError::invalid_input("cart must not be null"))?;
        let validation = self.validate_bulk_stock(&cart.items)?;
        let cart_message = if validation.all_valid {
            "All items in cart are available".to_string()
        } else {
            format!(
                "{} item(s) in cart have insufficient stock",
                validation.total_failed_products
            )
        };

        Ok(CartStockValidationResult {
            cart_id: cart.cart_id.clone(),
            total_item_count: cart.total_item_count(),
            total_value: cart.total_value(),
            cart_message,
            validation,
        })
    }

    /// Check an order's line items
    ///
    /// # Errors
    ///
    /// As [`validate_bulk_stock`](Self::validate_bulk_stock).
    pub fn validate_order_items_stock(
        &self,
        items: &[OrderItem],
    ) -> StockResult<BulkStockValidationResult> {
        self.validate_bulk_stock(items)
    }

    /// Stock snapshot for one product, using the configured threshold
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank id, `ProductNotFound` for an unknown product.
    pub fn get_stock_info(&self, product_id: &str) -> StockResult<StockInfo> {
        self.get_stock_info_with_threshold(product_id, None)
    }

    /// Stock snapshot for one product
    ///
    /// A `None` or negative threshold uses the configured default.
    pub fn get_stock_info_with_threshold(
        &self,
        product_id: &str,
        threshold: Option<i64>,
    ) -> StockResult<StockInfo> {
        let product_id = ProductId::validated(product_id)?;
        let threshold = self.threshold(threshold);
        let level = self.reservations.stock_level_of(&product_id)?;
        Ok(stock_info(product_id, &level, threshold))
    }

    /// Stock snapshots for many products
    ///
    /// Unknown ids map to a [`StockInfo::not_found`] placeholder instead of
    /// failing the batch.
    ///
    /// # Errors
    ///
    /// `Catalog` if a catalog read fails.
    pub fn get_bulk_stock_info(
        &self,
        product_ids: &[ProductId],
        threshold: Option<i64>,
    ) -> StockResult<HashMap<ProductId, StockInfo>> {
        let threshold = self.threshold(threshold);
        let mut infos = HashMap::with_capacity(product_ids.len());

        for product_id in product_ids {
            let info = if product_id.as_str().trim().is_empty() {
                StockInfo::not_found(product_id.clone(), threshold)
            } else {
                match self.reservations.stock_level_of(product_id) {
                    Ok(level) => stock_info(product_id.clone(), &level, threshold),
                    Err(e) if e.is_not_found() => {
                        StockInfo::not_found(product_id.clone(), threshold)
                    }
                    Err(e) => return Err(e),
                }
            };
            infos.insert(product_id.clone(), info);
        }
        Ok(infos)
    }

    /// Whether actual stock is at or below the threshold
    ///
    /// Compares the committed catalog count, not the available count. A `None`
    /// or negative threshold uses the configured default.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank id, `ProductNotFound` for an unknown product.
    pub fn is_stock_critically_low(
        &self,
        product_id: &str,
        threshold: Option<i64>,
    ) -> StockResult<bool> {
        Ok(self.get_stock_info_with_threshold(product_id, threshold)?.low_stock)
    }

    /// Customer-facing summary of a bulk validation
    pub fn generate_insufficient_stock_notification(
        &self,
        validation: &BulkStockValidationResult,
    ) -> InsufficientStockNotification {
        insufficient_stock_notification(validation)
    }

    fn threshold(&self, requested: Option<i64>) -> i64 {
        effective_threshold(requested, self.reservations.config().low_stock_threshold)
    }
}

fn stock_info(product_id: ProductId, level: &StockLevel, threshold: i64) -> StockInfo {
    let available = level.available();
    StockInfo {
        product_id,
        product_title: level.product.title.clone(),
        actual_stock: level.actual(),
        reserved_stock: level.reserved,
        available_stock: available,
        in_stock: available > 0,
        low_stock: level.actual() <= threshold,
        low_stock_threshold: threshold,
    }
}
