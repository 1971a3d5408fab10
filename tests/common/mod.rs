//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

pub use stockledger::{
    Clock, EngineConfig, InMemoryCatalog, ManualClock, Money, Product, ProductCatalog, ProductId,
    StockError, StockResult, StockReservationEngine, StockValidationEngine,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber once per binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn minutes(m: u64) -> Option<Duration> {
    Some(Duration::from_secs(m * 60))
}

pub fn product(id: &str, title: &str, stock: i64) -> Product {
    Product::new(id, title, Money::from_minor(1999), stock)
}

// ============================================================================
// TestEngine - catalog + clock + engines wired together
// ============================================================================

/// Engine stack over an in-memory catalog and a manual clock.
pub struct TestEngine {
    pub catalog: Arc<InMemoryCatalog>,
    pub clock: Arc<ManualClock>,
    pub reservations: Arc<StockReservationEngine>,
    pub validation: StockValidationEngine,
}

impl TestEngine {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self::with_config(products, EngineConfig::default())
    }

    pub fn with_config(products: impl IntoIterator<Item = Product>, config: EngineConfig) -> Self {
        init_tracing();
        let catalog = Arc::new(InMemoryCatalog::with_products(products));
        let clock = Arc::new(ManualClock::default());
        let reservations = Arc::new(
            StockReservationEngine::with_config(catalog.clone(), config)
                .expect("valid config")
                .with_clock(clock.clone()),
        );
        let validation = StockValidationEngine::new(Arc::clone(&reservations));
        Self {
            catalog,
            clock,
            reservations,
            validation,
        }
    }

    /// Single product "P" with the given stock
    pub fn single(stock: i64) -> Self {
        Self::new([product("P", "Widget", stock)])
    }

    pub fn actual(&self, product_id: &str) -> i64 {
        self.catalog
            .stock_of(&ProductId::new(product_id))
            .expect("product exists")
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

// ============================================================================
// Catalog doubles
// ============================================================================

/// Catalog wrapper that counts every call.
#[derive(Default)]
pub struct CountingCatalog {
    inner: InMemoryCatalog,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingCatalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            inner: InMemoryCatalog::with_products(products),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ProductCatalog for CountingCatalog {
    fn get_by_id(&self, product_id: &ProductId) -> StockResult<Option<Product>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(product_id)
    }

    fn update_stock(&self, product_id: &ProductId, new_stock: i64) -> StockResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_stock(product_id, new_stock)
    }
}

/// Catalog whose writes can be switched to fail.
#[derive(Default)]
pub struct FailingCatalog {
    inner: InMemoryCatalog,
    fail_writes: AtomicBool,
}

impl FailingCatalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            inner: InMemoryCatalog::with_products(products),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn stock_of(&self, product_id: &str) -> Option<i64> {
        self.inner.stock_of(&ProductId::new(product_id))
    }
}

impl ProductCatalog for FailingCatalog {
    fn get_by_id(&self, product_id: &ProductId) -> StockResult<Option<Product>> {
        self.inner.get_by_id(product_id)
    }

    fn update_stock(&self, product_id: &ProductId, new_stock: i64) -> StockResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StockError::catalog("simulated write failure"));
        }
        self.inner.update_stock(product_id, new_stock)
    }
}
