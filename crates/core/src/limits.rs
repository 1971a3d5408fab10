//! Defaults and input checks shared by the engines
//!
//! The engine configuration overrides these defaults. The checks here are the
//! preconditions every reserve/validate call runs before touching the catalog.

use std::time::Duration;

use crate::error::{StockError, StockResult};

/// Lease length used when the caller passes no timeout (minutes)
pub const DEFAULT_RESERVATION_TIMEOUT_MINUTES: u64 = 15;

/// Actual-stock level at or below which a product counts as low
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Interval for the optional background sweeper (seconds)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default lease as a `Duration`
pub const fn default_reservation_timeout() -> Duration {
    Duration::from_secs(DEFAULT_RESERVATION_TIMEOUT_MINUTES * 60)
}

/// Reject non-positive quantities
///
/// # Errors
/// Returns `InvalidInput` if `quantity <= 0`.
pub fn validate_quantity(quantity: i64) -> StockResult<()> {
    if quantity <= 0 {
        return Err(StockError::invalid_input(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    Ok(())
}

/// Pick the lease length: a missing or zero timeout falls back to `default`
pub fn effective_timeout(requested: Option<Duration>, default: Duration) -> Duration {
    match requested {
        Some(t) if !t.is_zero() => t,
        _ => default,
    }
}

/// Pick the low-stock threshold: a missing or negative threshold falls back to `default`
pub fn effective_threshold(requested: Option<i64>, default: i64) -> i64 {
    match requested {
        Some(t) if t >= 0 => t,
        _ => default,
    }
}
