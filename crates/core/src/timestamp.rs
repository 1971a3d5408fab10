//! Points in time for reservation expiry
//!
//! A [`Timestamp`] is a count of microseconds since the Unix epoch. Expiry
//! checks reduce to one integer compare, and an overflowing TTL pins the
//! expiry at the far end of the range instead of wrapping into the past.
//!
//! ```
//! use stockledger_core::Timestamp;
//! use std::time::Duration;
//!
//! let granted = Timestamp::from_secs(1000);
//! let expires_at = granted.saturating_add(Duration::from_secs(15 * 60));
//! assert!(Timestamp::from_secs(1901).is_after(expires_at));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Microseconds since Unix epoch
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

fn micros_of(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

impl Timestamp {
    /// 1970-01-01T00:00:00Z
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Wall-clock time, or `EPOCH` if the system clock reads earlier
    pub fn now() -> Self {
        Timestamp(micros_of(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
        ))
    }

    /// Microseconds since epoch
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Whole seconds since epoch
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    /// Raw microsecond count
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// `self + ttl`, pinned at the largest representable instant
    pub fn saturating_add(&self, ttl: Duration) -> Self {
        Timestamp(self.0.saturating_add(micros_of(ttl)))
    }

    /// Strictly later than `other`
    pub fn is_after(&self, other: Timestamp) -> bool {
        *self > other
    }
}

/// RFC 3339 in UTC. Instants past chrono's range print as its maximum.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let datetime = i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_micros)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        f.write_str(&datetime.to_rfc3339())
    }
}
