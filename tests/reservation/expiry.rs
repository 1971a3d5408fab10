//! Lease expiry and cleanup

use crate::common::*;
use std::time::Duration;
use stockledger::ReservationId;

#[test]
fn expired_reservation_is_invisible_before_cleanup() {
    let t = TestEngine::single(10);
    let engine = &t.reservations;
    engine
        .reserve_stock("P", 6, "R1", Some(Duration::from_secs(30)))
        .unwrap();

    t.advance(Duration::from_secs(31));
    assert_eq!(engine.get_available_stock("P").unwrap(), 10);
    assert!(engine.get_reservation("R1").is_none());
    assert!(engine.get_active_reservations().is_empty());
}

#[test]
fn expiry_boundary_is_exclusive() {
    let t = TestEngine::single(10);
    let engine = &t.reservations;
    engine
        .reserve_stock("P", 6, "R1", Some(Duration::from_secs(30)))
        .unwrap();

    // Exactly at expires_at the lease still holds
    t.advance(Duration::from_secs(30));
    assert_eq!(engine.get_available_stock("P").unwrap(), 4);

    t.advance(Duration::from_micros(1));
    assert_eq!(engine.get_available_stock("P").unwrap(), 10);
}

#[test]
fn cleanup_then_confirm_fails_with_inventory() {
    let t = TestEngine::single(10);
    let engine = &t.reservations;
    engine
        .reserve_stock("P", 2, "short", Some(Duration::from_secs(1)))
        .unwrap();

    t.advance(Duration::from_secs(2));
    assert_eq!(engine.cleanup_expired_reservations(), 1);
    assert!(!engine.get_active_reservations().contains_key(&ReservationId::new("short")));
    assert!(engine.confirm_reservation("short").unwrap_err().is_inventory());
    assert_eq!(t.actual("P"), 10);
}

#[test]
fn cleanup_is_idempotent() {
    let t = TestEngine::single(10);
    let engine = &t.reservations;
    for i in 0..5 {
        engine
            .reserve_stock("P", 1, &format!("R{}", i), Some(Duration::from_secs(1)))
            .unwrap();
    }
    engine.reserve_stock("P", 1, "keeper", minutes(60)).unwrap();

    t.advance(Duration::from_secs(10));
    assert_eq!(engine.cleanup_expired_reservations(), 5);
    assert_eq!(engine.cleanup_expired_reservations(), 0);
    assert_eq!(engine.ledger_len(), 1);
    assert_eq!(engine.metrics().expired, 5);
}

#[test]
fn default_lease_comes_from_config() {
    let config = EngineConfig::default().with_default_timeout_minutes(2);
    let t = TestEngine::with_config([product("P", "Widget", 10)], config);
    let engine = &t.reservations;
    engine.reserve_stock("P", 4, "R1", None).unwrap();

    t.advance(Duration::from_secs(119));
    assert_eq!(engine.get_reserved_stock("P").unwrap(), 4);
    t.advance(Duration::from_secs(2));
    assert_eq!(engine.get_reserved_stock("P").unwrap(), 0);
}

#[test]
fn expired_id_can_be_reserved_again() {
    let t = TestEngine::single(10);
    let engine = &t.reservations;
    engine
        .reserve_stock("P", 3, "R1", Some(Duration::from_secs(5)))
        .unwrap();
    t.advance(Duration::from_secs(6));

    assert!(engine.reserve_stock("P", 9, "R1", None).unwrap());
    assert_eq!(engine.get_reserved_stock("P").unwrap(), 9);
}
