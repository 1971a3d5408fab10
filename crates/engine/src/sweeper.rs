//! Background expiry sweep
//!
//! The engine never spawns threads. Embedders that want expired reservations
//! reclaimed on a timer start a [`ReservationSweeper`], which calls
//! [`StockReservationEngine::cleanup_expired_reservations`] on an interval.
//!
//! # Design Notes
//!
//! - Runs on its own thread and takes the same per-product locks as any
//!   other caller
//! - Graceful shutdown via atomic flag, polled at least every 100ms
//! - The first sweep happens one interval after `start`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace};

use crate::reservation::StockReservationEngine;

/// Periodic caller of `cleanup_expired_reservations`
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use std::time::Duration;
/// use stockledger_engine::{ReservationSweeper, StockReservationEngine};
///
/// let engine = Arc::new(StockReservationEngine::new(catalog));
/// let sweeper = ReservationSweeper::new(Arc::clone(&engine), Duration::from_secs(60));
/// let handle = sweeper.start();
///
/// // ... serve requests ...
///
/// sweeper.shutdown();
/// handle.join().unwrap();
/// ```
#[derive(Debug)]
pub struct ReservationSweeper {
    engine: Arc<StockReservationEngine>,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
}

impl ReservationSweeper {
    /// Create a sweeper for `engine` running every `interval`
    ///
    /// Intervals below one millisecond are rounded up to one millisecond.
    pub fn new(engine: Arc<StockReservationEngine>, interval: Duration) -> Self {
        Self {
            engine,
            interval: interval.max(Duration::from_millis(1)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a sweeper using the engine's configured interval
    pub fn from_config(engine: Arc<StockReservationEngine>) -> Self {
        let interval = engine.config().sweep_interval();
        Self::new(engine, interval)
    }

    /// Sweep interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the sweep thread
    ///
    /// The thread runs until [`shutdown`](Self::shutdown) is called.
    pub fn start(&self) -> JoinHandle<()> {
        let engine = Arc::clone(&self.engine);
        let shutdown = Arc::clone(&self.shutdown);
        let interval = self.interval;

        thread::spawn(move || {
            debug!(target: "stockledger::sweeper", ?interval, "Sweeper started");
            let tick = Duration::from_millis(100).min(interval);

            while !shutdown.load(Ordering::Relaxed) {
                let mut elapsed = Duration::ZERO;
                while elapsed < interval {
                    if shutdown.load(Ordering::Relaxed) {
                        debug!(target: "stockledger::sweeper", "Sweeper stopped");
                        return;
                    }
                    thread::sleep(tick);
                    elapsed += tick;
                }

                let evicted = engine.cleanup_expired_reservations();
                trace!(target: "stockledger::sweeper", evicted, "Sweep finished");
            }
            debug!(target: "stockledger::sweeper", "Sweeper stopped");
        })
    }

    /// Signal the thread to exit after its current tick
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Check if shutdown has been signaled
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}
