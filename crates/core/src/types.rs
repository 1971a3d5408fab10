//! Identifier and money types
//!
//! - ProductId: catalog key for a product
//! - ReservationId: caller-supplied key for one provisional claim
//! - Money: monetary amount in minor units (cents)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use uuid::Uuid;

use crate::error::{StockError, StockResult};

/// Catalog identifier of a product
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a raw id without checking it
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Wrap a raw id, rejecting empty or whitespace-only input
    ///
    /// # Errors
    /// Returns `InvalidInput` if the id is blank.
    pub fn validated(id: &str) -> StockResult<Self> {
        if id.trim().is_empty() {
            return Err(StockError::invalid_input("product id must not be empty"));
        }
        Ok(Self(id.to_string()))
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Caller-supplied identifier of a reservation
///
/// Callers usually derive it from their own checkout or cart-line id. Callers
/// without one can use [`ReservationId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Wrap a raw id without checking it
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a fresh random id (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a raw id, rejecting empty or whitespace-only input
    ///
    /// # Errors
    /// Returns `InvalidInput` if the id is blank.
    pub fn validated(id: &str) -> StockResult<Self> {
        if id.trim().is_empty() {
            return Err(StockError::invalid_input("reservation id must not be empty"));
        }
        Ok(Self(id.to_string()))
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReservationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ReservationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ReservationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Monetary amount in minor currency units
///
/// Integer cents keep cart totals exact. Currency is a catalog concern and
/// not tracked here.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount
    pub const ZERO: Money = Money(0);

    /// Create from minor units (e.g. cents)
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Amount in minor units
    pub const fn as_minor(&self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, saturating on overflow
    pub fn times(&self, quantity: i64) -> Money {
        Money(self.0.saturating_mul(quantity))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        self.times(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
