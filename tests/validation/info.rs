//! Stock info snapshots and low-stock checks

use crate::common::*;

#[test]
fn stock_info_reflects_reservations() {
    let t = TestEngine::single(30);
    t.reservations.reserve_stock("P", 12, "R1", None).unwrap();

    let info = t.validation.get_stock_info("P").unwrap();
    assert_eq!(info.product_title, "Widget");
    assert_eq!(info.actual_stock, 30);
    assert_eq!(info.reserved_stock, 12);
    assert_eq!(info.available_stock, 18);
    assert!(info.in_stock);
    assert!(!info.low_stock);
    assert_eq!(info.low_stock_threshold, 10);
}

#[test]
fn low_stock_uses_actual_not_available() {
    let t = TestEngine::single(11);
    t.reservations.reserve_stock("P", 11, "R1", None).unwrap();

    // Nothing available, but 11 units on hand is above the default threshold
    assert!(!t.validation.is_stock_critically_low("P", None).unwrap());
    t.catalog.set_stock(&ProductId::new("P"), 10).unwrap();
    assert!(t.validation.is_stock_critically_low("P", None).unwrap());
}

#[test]
fn negative_threshold_uses_configured_default() {
    let config = EngineConfig::default().with_low_stock_threshold(3);
    let t = TestEngine::with_config([product("P", "Widget", 5)], config);

    assert!(!t.validation.is_stock_critically_low("P", Some(-1)).unwrap());
    assert!(!t.validation.is_stock_critically_low("P", None).unwrap());
    assert!(t.validation.is_stock_critically_low("P", Some(5)).unwrap());
    assert_eq!(t.validation.get_stock_info("P").unwrap().low_stock_threshold, 3);
}

#[test]
fn stock_info_for_missing_product_fails() {
    let t = TestEngine::single(1);
    assert!(t.validation.get_stock_info("ghost").unwrap_err().is_not_found());
    assert!(t
        .validation
        .is_stock_critically_low("ghost", None)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn bulk_info_is_lenient() {
    let t = TestEngine::new([product("A", "Apple", 4), product("B", "Banana", 40)]);
    let ids = [ProductId::new("A"), ProductId::new("B"), ProductId::new("Z")];

    let infos = t.validation.get_bulk_stock_info(&ids, Some(5)).unwrap();
    assert_eq!(infos.len(), 3);
    assert!(infos[&ProductId::new("A")].low_stock);
    assert!(!infos[&ProductId::new("B")].low_stock);

    let z = &infos[&ProductId::new("Z")];
    assert_eq!(z.product_title, "Product Not Found");
    assert_eq!(z.actual_stock, 0);
    assert_eq!(z.available_stock, 0);
    assert!(!z.in_stock);
}
