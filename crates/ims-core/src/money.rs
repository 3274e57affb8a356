//! # Money Module
//!
//! Amounts are integer cents everywhere: in SQLite columns, in domain
//! structs and in DTOs. `Money` wraps the few places that compute or print
//! an amount, so overflow is checked and formatting lives in one spot.
//!
//! ## Usage
//! ```rust
//! use ims_core::money::Money;
//!
//! let total = Money::from_cents(1099).checked_multiply_quantity(3).unwrap();
//! assert_eq!(total.cents(), 3297);
//! assert_eq!(total.to_string(), "$32.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// An amount in cents. Signed, since profits can be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Line total for `qty` units, `None` on overflow.
    ///
    /// ```rust
    /// use ims_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).checked_multiply_quantity(5), Some(Money::from_cents(5000)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

/// `$12.34`, with a leading `-` for negative amounts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(i64::MIN).to_string(), "-$92233720368547758.08");
    }

    #[test]
    fn test_checked_multiply() {
        assert_eq!(
            Money::from_cents(1000).checked_multiply_quantity(5),
            Some(Money::from_cents(5000))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_cents(2500)).unwrap();
        assert_eq!(json, "2500");
    }
}
