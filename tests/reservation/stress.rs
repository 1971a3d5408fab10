//! Stress Tests
//!
//! Heavy workloads, all marked #[ignore] for opt-in execution.
//! Run with: cargo test --test reservation stress -- --ignored

use crate::common::*;
use rand::Rng;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

/// Mixed reserve/confirm/release on a handful of hot products
#[test]
#[ignore]
fn stress_hot_products_mixed_workload() {
    let products: Vec<_> = (0..4)
        .map(|i| product(&format!("hot-{}", i), "Hot", 500))
        .collect();
    let t = TestEngine::new(products);
    let engine = Arc::clone(&t.reservations);
    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let confirmed: Arc<Vec<AtomicI64>> = Arc::new((0..4).map(|_| AtomicI64::new(0)).collect());
    let ops = Arc::new(AtomicU64::new(0));

    let start = Instant::now();
    let handles: Vec<_> = (0..threads)
        .map(|thread_id| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            let confirmed = Arc::clone(&confirmed);
            let ops = Arc::clone(&ops);

            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                barrier.wait();
                for i in 0..2_000 {
                    let p = rng.gen_range(0..4);
                    let sku = format!("hot-{}", p);
                    let id = format!("t{}-{}", thread_id, i);
                    let qty = rng.gen_range(1..4);
                    if engine.reserve_stock(&sku, qty, &id, None).unwrap() {
                        if rng.gen_bool(0.3) && engine.confirm_reservation(&id).is_ok() {
                            confirmed[p].fetch_add(qty, Ordering::Relaxed);
                        } else {
                            engine.release_reservation(&id);
                        }
                    }
                    ops.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    let elapsed = start.elapsed();

    for p in 0..4 {
        let sku = format!("hot-{}", p);
        let sold = confirmed[p].load(Ordering::Relaxed);
        assert_eq!(t.actual(&sku), 500 - sold);
        assert!(t.actual(&sku) >= 0);
        assert_eq!(engine.get_reserved_stock(&sku).unwrap(), 0);
    }

    let total = ops.load(Ordering::Relaxed);
    println!(
        "{} ops in {:?} ({:.0} ops/s)",
        total,
        elapsed,
        total as f64 / elapsed.as_secs_f64()
    );
}

/// Reserves racing with expiry sweeps
#[test]
#[ignore]
fn stress_reserve_while_sweeping() {
    let t = TestEngine::single(1_000);
    let engine = Arc::clone(&t.reservations);
    let clock = Arc::clone(&t.clock);
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads + 1));

    let handles: Vec<_> = (0..threads)
        .map(|thread_id| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..5_000 {
                    let id = format!("t{}-{}", thread_id, i);
                    let _ = engine
                        .reserve_stock("P", 1, &id, Some(Duration::from_secs(1)))
                        .unwrap();
                }
            })
        })
        .collect();

    barrier.wait();
    for _ in 0..200 {
        clock.advance(Duration::from_millis(500));
        engine.cleanup_expired_reservations();
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(engine.get_reserved_stock("P").unwrap() <= 1_000);
    clock.advance(Duration::from_secs(5));
    engine.cleanup_expired_reservations();
    assert_eq!(engine.ledger_len(), 0);
    assert_eq!(engine.get_available_stock("P").unwrap(), 1_000);
}
