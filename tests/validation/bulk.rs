//! Bulk, cart and order validation

use crate::common::*;
use std::sync::Arc;
use stockledger::{Cart, CartItem, OrderItem, StockRequest};

#[test]
fn bulk_reports_failed_subset() {
    let t = TestEngine::new([product("A", "Apple", 15), product("B", "Banana", 1)]);

    let bulk = t
        .validation
        .validate_bulk_stock(&[StockRequest::new("A", 3), StockRequest::new("B", 2)])
        .unwrap();

    assert!(!bulk.all_valid);
    assert_eq!(bulk.total_products, 2);
    assert_eq!(bulk.total_failed_products, 1);
    assert_eq!(bulk.message, "1 out of 2 items failed stock validation");

    let failed = &bulk.failed_results[0];
    assert_eq!(failed.product_id, ProductId::new("B"));
    assert_eq!(failed.requested_quantity, 2);
    assert_eq!(failed.available_stock, 1);
    assert_eq!(failed.shortfall_quantity, 1);
}

#[test]
fn bulk_all_valid_message() {
    let t = TestEngine::new([product("A", "Apple", 15), product("B", "Banana", 4)]);
    let bulk = t
        .validation
        .validate_bulk_stock(&[StockRequest::new("A", 15), StockRequest::new("B", 4)])
        .unwrap();
    assert!(bulk.all_valid);
    assert!(bulk.failed_results.is_empty());
    assert_eq!(bulk.message, "All items passed stock validation");
}

#[test]
fn empty_bulk_touches_nothing() {
    let catalog = Arc::new(CountingCatalog::new([product("A", "Apple", 1)]));
    let reservations = Arc::new(StockReservationEngine::new(catalog.clone()));
    let validation = StockValidationEngine::new(Arc::clone(&reservations));

    let bulk = validation.validate_bulk_stock::<StockRequest>(&[]).unwrap();

    assert!(bulk.all_valid);
    assert_eq!(bulk.total_products, 0);
    assert_eq!(bulk.total_failed_products, 0);
    assert_eq!(bulk.message, "No items to validate");
    assert_eq!(catalog.reads(), 0);
    assert_eq!(catalog.writes(), 0);
    assert_eq!(reservations.ledger_len(), 0);
}

#[test]
fn bulk_reads_catalog_once_per_line() {
    let catalog = Arc::new(CountingCatalog::new([product("A", "Apple", 5)]));
    let reservations = Arc::new(StockReservationEngine::new(catalog.clone()));
    let validation = StockValidationEngine::new(reservations);

    validation
        .validate_bulk_stock(&[StockRequest::new("A", 1), StockRequest::new("A", 2)])
        .unwrap();
    assert_eq!(catalog.reads(), 2);
    assert_eq!(catalog.writes(), 0);
}

#[test]
fn bulk_with_unknown_product_is_not_found() {
    let t = TestEngine::single(5);
    let err = t
        .validation
        .validate_bulk_stock(&[StockRequest::new("P", 1), StockRequest::new("gone", 1)])
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn bulk_with_blank_product_id_is_invalid() {
    let t = TestEngine::single(5);
    let err = t
        .validation
        .validate_bulk_stock(&[StockRequest::new("P", 1), StockRequest::new("  ", 1)])
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn cart_totals_and_message() {
    let t = TestEngine::new([product("A", "Apple", 10), product("B", "Banana", 10)]);
    let cart = Cart::new("cart-9")
        .with_item(CartItem::new("A", 2, Money::from_minor(350)))
        .with_item(CartItem::new("B", 3, Money::from_minor(100)));

    let result = t.validation.validate_cart_stock(Some(&cart)).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.cart_id, "cart-9");
    assert_eq!(result.total_item_count, 5);
    assert_eq!(result.total_value, Money::from_minor(1000));
    assert_eq!(result.total_value.to_string(), "10.00");
    assert_eq!(result.cart_message, "All items in cart are available");
}

#[test]
fn cart_with_shortage() {
    let t = TestEngine::new([product("A", "Apple", 1)]);
    let cart = Cart::new("c").with_item(CartItem::new("A", 2, Money::from_minor(100)));

    let result = t.validation.validate_cart_stock(Some(&cart)).unwrap();
    assert!(!result.is_valid());
    assert_eq!(result.cart_message, "1 item(s) in cart have insufficient stock");
}

#[test]
fn cart_item_count_saturates() {
    let t = TestEngine::single(10);
    let cart = Cart::new("huge")
        .with_item(CartItem::new("P", i64::MAX, Money::from_minor(1)))
        .with_item(CartItem::new("P", 1, Money::from_minor(1)));

    let result = t.validation.validate_cart_stock(Some(&cart)).unwrap();
    assert!(!result.is_valid());
    assert_eq!(result.validation.total_failed_products, 1);
    assert_eq!(result.total_item_count, i64::MAX);
}

#[test]
fn missing_cart_is_rejected() {
    let t = TestEngine::single(1);
    assert!(t
        .validation
        .validate_cart_stock(None)
        .unwrap_err()
        .is_validation());
}

#[test]
fn empty_cart_is_valid() {
    let t = TestEngine::single(1);
    let result = t
        .validation
        .validate_cart_stock(Some(&Cart::new("empty")))
        .unwrap();
    assert!(result.is_valid());
    assert_eq!(result.validation.message, "No items to validate");
    assert_eq!(result.total_item_count, 0);
}

#[test]
fn order_items_see_reservations() {
    let t = TestEngine::single(10);
    t.reservations.reserve_stock("P", 8, "hold", None).unwrap();

    let items = [OrderItem::new("P", 3, Money::from_minor(100))];
    let bulk = t.validation.validate_order_items_stock(&items).unwrap();
    assert!(!bulk.all_valid);
    assert_eq!(bulk.failed_results[0].available_stock, 2);
}
