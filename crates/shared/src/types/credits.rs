//! Credit amounts with decimal precision.
//!
//! CRITICAL: Never use floating-point for credit calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A spendable credit amount (also used for course prices).
///
/// Credits are a single-denomination ledger value: earned through referrals,
/// spent on course enrollment. Balances are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credits(pub Decimal);

impl Credits {
    /// Zero credits.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new credit amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the inner decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if this balance covers `price`.
    #[must_use]
    pub fn covers(self, price: Self) -> bool {
        self.0 >= price.0
    }

    /// Adds an amount, returning the new balance.
    #[must_use]
    pub fn credit(self, amount: Self) -> Self {
        Self(self.0 + amount.0)
    }

    /// Subtracts `amount` exactly, or returns `None` if the balance does not
    /// cover it. Balances never go negative.
    #[must_use]
    pub fn debit(self, amount: Self) -> Option<Self> {
        if self.covers(amount) {
            Some(Self(self.0 - amount.0))
        } else {
            None
        }
    }

    /// The amount still missing to cover `price` (zero if already covered).
    #[must_use]
    pub fn shortfall(self, price: Self) -> Self {
        if self.covers(price) {
            Self::ZERO
        } else {
            Self(price.0 - self.0)
        }
    }
}

impl std::fmt::Display for Credits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Credits {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_adds() {
        let balance = Credits::new(dec!(10.00));
        assert_eq!(balance.credit(Credits::new(dec!(50))), Credits::new(dec!(60.00)));
    }

    #[test]
    fn test_debit_exact() {
        let balance = Credits::new(dec!(50.00));
        let after = balance.debit(Credits::new(dec!(29.99))).unwrap();
        assert_eq!(after, Credits::new(dec!(20.01)));
    }

    #[test]
    fn test_debit_insufficient() {
        let balance = Credits::new(dec!(20));
        assert!(balance.debit(Credits::new(dec!(30))).is_none());
    }

    #[test]
    fn test_debit_to_zero() {
        let balance = Credits::new(dec!(30));
        assert_eq!(balance.debit(Credits::new(dec!(30))), Some(Credits::ZERO));
    }

    #[test]
    fn test_shortfall() {
        let balance = Credits::new(dec!(20));
        assert_eq!(balance.shortfall(Credits::new(dec!(30))), Credits::new(dec!(10)));
        assert_eq!(balance.shortfall(Credits::new(dec!(15))), Credits::ZERO);
    }

    #[test]
    fn test_covers() {
        let balance = Credits::new(dec!(30));
        assert!(balance.covers(Credits::new(dec!(30))));
        assert!(balance.covers(Credits::ZERO));
        assert!(!balance.covers(Credits::new(dec!(30.01))));
    }
}
