//! In-memory product catalog
//!
//! A `DashMap`-backed [`ProductCatalog`] used by tests, benches and embedders
//! that keep their catalog in process. Writes only lock the target product's
//! shard, so restocks on one product never stall reads of another.

use dashmap::DashMap;

use stockledger_core::{ProductCatalog, Product, ProductId, StockError, StockResult};

/// Catalog held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: DashMap<ProductId, Product>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
        }
    }

    /// Create a catalog pre-filled with `products`
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Add or replace a product
    pub fn insert(&self, product: Product) -> Option<Product> {
        self.products.insert(product.product_id.clone(), product)
    }

    /// Remove a product
    pub fn remove(&self, product_id: &ProductId) -> Option<Product> {
        self.products.remove(product_id).map(|(_, p)| p)
    }

    /// Current stock of a product, if present
    pub fn stock_of(&self, product_id: &ProductId) -> Option<i64> {
        self.products.get(product_id).map(|p| p.stock)
    }

    /// Overwrite stock from outside the engine (restock, manual correction)
    ///
    /// # Errors
    /// Returns `ProductNotFound` if the product is not in the catalog.
    pub fn set_stock(&self, product_id: &ProductId, stock: i64) -> StockResult<()> {
        match self.products.get_mut(product_id) {
            Some(mut product) => {
                product.stock = stock;
                Ok(())
            }
            None => Err(StockError::product_not_found(product_id)),
        }
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn get_by_id(&self, product_id: &ProductId) -> StockResult<Option<Product>> {
        Ok(self.products.get(product_id).map(|p| p.value().clone()))
    }

    fn update_stock(&self, product_id: &ProductId, new_stock: i64) -> StockResult<()> {
        self.set_stock(product_id, new_stock)
    }
}
