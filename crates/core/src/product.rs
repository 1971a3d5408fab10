//! Catalog records and shopping line items
//!
//! `Product` is what the catalog hands back. Carts and orders carry line items
//! that reference products by id; the validation engine only needs the
//! `(product_id, quantity)` pair from each, exposed through [`StockLine`].

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// A product as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog key
    pub product_id: ProductId,
    /// Display title
    pub title: String,
    /// Unit price
    pub price: Money,
    /// Persisted, committed stock count
    pub stock: i64,
}

impl Product {
    /// Create a product record
    pub fn new(
        product_id: impl Into<ProductId>,
        title: impl Into<String>,
        price: Money,
        stock: i64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            price,
            stock,
        }
    }
}

/// Anything that asks for a quantity of one product
pub trait StockLine {
    /// Product being requested
    fn product_id(&self) -> &ProductId;
    /// Units requested
    fn quantity(&self) -> i64;
}

/// Bare `(product, quantity)` request used for bulk validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRequest {
    /// Product being requested
    pub product_id: ProductId,
    /// Units requested
    pub quantity: i64,
}

impl StockRequest {
    /// Create a request
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

impl StockLine for StockRequest {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// One line of a shopping cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product in the cart
    pub product_id: ProductId,
    /// Units in the cart
    pub quantity: i64,
    /// Unit price captured when the item was added
    pub unit_price: Money,
}

impl CartItem {
    /// Create a cart line
    pub fn new(product_id: impl Into<ProductId>, quantity: i64, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Price of the whole line
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

impl StockLine for CartItem {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// A shopping cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart identifier
    pub cart_id: String,
    /// Line items
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new(cart_id: impl Into<String>) -> Self {
        Self {
            cart_id: cart_id.into(),
            items: Vec::new(),
        }
    }

    /// Builder-style line append
    pub fn with_item(mut self, item: CartItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sum of quantities across lines, saturating at `i64::MAX`
    pub fn total_item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Sum of unit price × quantity across lines
    pub fn total_value(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// One line of a placed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Ordered product
    pub product_id: ProductId,
    /// Units ordered
    pub quantity: i64,
    /// Unit price at order time
    pub unit_price: Money,
}

impl OrderItem {
    /// Create an order line
    pub fn new(product_id: impl Into<ProductId>, quantity: i64, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }
}

impl StockLine for OrderItem {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }
}
