//! Collaborator traits
//!
//! The product catalog is owned by another service. The engine needs exactly two
//! operations from it: read a product and overwrite its stock count. Anything
//! implementing [`ProductCatalog`] can back the engine, from the in-memory
//! catalog in `stockledger-storage` to a database-backed repository.

use std::sync::Arc;

use crate::error::StockResult;
use crate::product::Product;
use crate::types::ProductId;

/// Source of truth for persisted product stock
///
/// Thread safety: all methods may be called concurrently from many threads.
pub trait ProductCatalog: Send + Sync {
    /// Read a product by id
    ///
    /// Returns `Ok(None)` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Catalog` if the backing store cannot be read.
    fn get_by_id(&self, product_id: &ProductId) -> StockResult<Option<Product>>;

    /// Overwrite the persisted stock count
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product is gone, or `Catalog` if the
    /// write cannot be performed. A failed write must leave stock unchanged.
    fn update_stock(&self, product_id: &ProductId, new_stock: i64) -> StockResult<()>;
}

impl<C: ProductCatalog + ?Sized> ProductCatalog for Arc<C> {
    fn get_by_id(&self, product_id: &ProductId) -> StockResult<Option<Product>> {
        (**self).get_by_id(product_id)
    }

    fn update_stock(&self, product_id: &ProductId, new_stock: i64) -> StockResult<()> {
        (**self).update_stock(product_id, new_stock)
    }
}
