// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Currency-tagged money value type.
//!
//! Arithmetic and comparisons are only defined between values of the same
//! currency; mixing currencies is an error, never a silent conversion.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Currencies handled by the service.
///
/// USDC is the settlement asset, PEN the display currency for recipients in
/// Peru, ETH the gas asset on Base. USD appears only in exchange-rate quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usdc,
    Usd,
    Pen,
    Eth,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ticker = match self {
            Currency::Usdc => "USDC",
            Currency::Usd => "USD",
            Currency::Pen => "PEN",
            Currency::Eth => "ETH",
        };
        write!(f, "{ticker}")
    }
}

/// Errors from money construction and arithmetic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoneyError {
    #[error("Money value cannot be negative")]
    Negative,

    #[error("Cannot operate on different currencies: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    #[error("Insufficient funds")]
    InsufficientFunds,
}

/// An immutable non-negative amount tagged with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Money {
    value: f64,
    currency: Currency,
}

impl Money {
    /// Create a money value; fails if `value` is negative.
    pub fn new(value: f64, currency: Currency) -> Result<Self, MoneyError> {
        if value < 0.0 {
            return Err(MoneyError::Negative);
        }
        Ok(Self { value, currency })
    }

    pub fn from_usdc(value: f64) -> Result<Self, MoneyError> {
        Self::new(value, Currency::Usdc)
    }

    pub fn from_pen(value: f64) -> Result<Self, MoneyError> {
        Self::new(value, Currency::Pen)
    }

    pub fn from_eth(value: f64) -> Result<Self, MoneyError> {
        Self::new(value, Currency::Eth)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        Money::new(self.value + other.value, self.currency)
    }

    /// Subtract `other`; fails with [`MoneyError::InsufficientFunds`] if the
    /// result would be negative.
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let result = self.value - other.value;
        if result < 0.0 {
            return Err(MoneyError::InsufficientFunds);
        }
        Money::new(result, self.currency)
    }

    pub fn is_greater_than(&self, other: &Money) -> Result<bool, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.value > other.value)
    }

    pub fn is_less_than(&self, other: &Money) -> Result<bool, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.value < other.value)
    }

    pub fn is_equal(&self, other: &Money) -> Result<bool, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.value == other.value)
    }

    /// Display string for the UI layer. Not used by pipeline logic.
    pub fn format(&self) -> String {
        match self.currency {
            Currency::Pen => format!("S/ {:.2}", self.value),
            Currency::Usdc | Currency::Usd => format!("${:.2}", self.value),
            _ => format!("{:.4} {}", self.value, self.currency),
        }
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_value_is_rejected() {
        let err = Money::from_usdc(-10.0).unwrap_err();
        assert_eq!(err, MoneyError::Negative);
        assert_eq!(err.to_string(), "Money value cannot be negative");
    }

    #[test]
    fn add_same_currency() {
        let a = Money::from_usdc(10.0).unwrap();
        let b = Money::from_usdc(2.5).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.value(), 12.5);
        assert_eq!(sum.currency(), Currency::Usdc);
        // Operands are untouched.
        assert_eq!(a.value(), 10.0);
        assert_eq!(b.value(), 2.5);
    }

    #[test]
    fn subtract_below_zero_is_insufficient_funds() {
        let a = Money::from_usdc(100.0).unwrap();
        let b = Money::from_usdc(150.0).unwrap();
        let err = a.subtract(&b).unwrap_err();
        assert_eq!(err, MoneyError::InsufficientFunds);
        assert_eq!(err.to_string(), "Insufficient funds");
        assert_eq!(a.value(), 100.0);
    }

    #[test]
    fn subtract_to_exactly_zero_is_allowed() {
        let a = Money::from_usdc(50.0).unwrap();
        let result = a.subtract(&Money::from_usdc(50.0).unwrap()).unwrap();
        assert_eq!(result.value(), 0.0);
    }

    #[test]
    fn cross_currency_operations_fail() {
        let usdc = Money::from_usdc(10.0).unwrap();
        let pen = Money::from_pen(10.0).unwrap();

        assert!(matches!(
            usdc.add(&pen),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            usdc.subtract(&pen),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            usdc.is_greater_than(&pen),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            usdc.is_equal(&pen),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn comparisons() {
        let small = Money::from_usdc(1.0).unwrap();
        let large = Money::from_usdc(2.0).unwrap();
        assert!(large.is_greater_than(&small).unwrap());
        assert!(small.is_less_than(&large).unwrap());
        assert!(small.is_equal(&Money::from_usdc(1.0).unwrap()).unwrap());
    }

    #[test]
    fn format_per_currency() {
        assert_eq!(Money::from_pen(372.0).unwrap().format(), "S/ 372.00");
        assert_eq!(Money::from_usdc(50.5).unwrap().format(), "$50.50");
        assert_eq!(Money::from_eth(0.25).unwrap().format(), "0.2500 ETH");
    }
}
