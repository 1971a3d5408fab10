//! Single-item validation

use crate::common::*;
use stockledger::StockReason;

#[test]
fn valid_request_reports_reserved_and_available() {
    let t = TestEngine::single(20);
    t.reservations.reserve_stock("P", 5, "R1", None).unwrap();

    let r = t.validation.validate_product_stock("P", 10).unwrap();
    assert!(r.valid);
    assert_eq!(r.actual_stock, 20);
    assert_eq!(r.reserved_stock, 5);
    assert_eq!(r.available_stock, 15);
    assert_eq!(r.shortfall_quantity, 0);
    assert_eq!(r.reason, StockReason::StockAvailable);
}

#[test]
fn short_request_reports_shortfall() {
    let t = TestEngine::single(20);
    t.reservations.reserve_stock("P", 15, "R1", None).unwrap();

    let r = t.validation.validate_product_stock("P", 8).unwrap();
    assert!(!r.valid);
    assert_eq!(r.available_stock, 5);
    assert_eq!(r.shortfall_quantity, 3);
    assert_eq!(r.reason, StockReason::InsufficientStock);
}

#[test]
fn oversized_request_against_negative_availability() {
    let t = TestEngine::single(10);
    t.reservations.reserve_stock("P", 10, "R1", None).unwrap();
    t.catalog.set_stock(&ProductId::new("P"), 5).unwrap();

    let r = t.validation.validate_product_stock("P", i64::MAX).unwrap();
    assert!(!r.valid);
    assert_eq!(r.available_stock, -5);
    assert_eq!(r.shortfall_quantity, i64::MAX);
    assert_eq!(
        r.message,
        format!("Insufficient stock. Requested: {}, Available: 0", i64::MAX)
    );
}

#[test]
fn validation_never_reserves() {
    let t = TestEngine::single(3);
    for _ in 0..5 {
        assert!(t.validation.validate_product_stock("P", 3).unwrap().valid);
    }
    assert_eq!(t.reservations.get_reserved_stock("P").unwrap(), 0);
}

#[test]
fn preconditions_match_reserve() {
    let t = TestEngine::single(3);
    assert!(t
        .validation
        .validate_product_stock("", 1)
        .unwrap_err()
        .is_validation());
    assert!(t
        .validation
        .validate_product_stock("P", -1)
        .unwrap_err()
        .is_validation());
    assert!(t
        .validation
        .validate_product_stock("missing", 1)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn result_serializes_with_wire_reason() {
    let t = TestEngine::single(1);
    let r = t.validation.validate_product_stock("P", 2).unwrap();
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["reason"], "INSUFFICIENT_STOCK");
    assert_eq!(json["shortfall_quantity"], 1);
    assert_eq!(json["product_title"], "Widget");
}
