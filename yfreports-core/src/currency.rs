//! Minor-unit currency normalization.
//!
//! Johannesburg listings quote in Rand cents (`ZAc`). Every monetary value
//! reported in the minor unit is divided into the major unit (`ZAR`) before it
//! reaches an output row. The rule fires only on the minor code, so applying
//! it to an already-normalized value is a no-op.

use serde::{Deserialize, Serialize};

/// Currency rewrite: `minor_code` amounts become `major_code` amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurrencyRule {
    pub minor_code: String,
    pub major_code: String,
    /// Minor units per major unit.
    pub divisor: f64,
}

impl Default for CurrencyRule {
    fn default() -> Self {
        Self {
            minor_code: "ZAc".into(),
            major_code: "ZAR".into(),
            divisor: 100.0,
        }
    }
}

impl CurrencyRule {
    pub fn new(minor_code: impl Into<String>, major_code: impl Into<String>, divisor: f64) -> Self {
        Self {
            minor_code: minor_code.into(),
            major_code: major_code.into(),
            divisor,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.divisor.is_finite() || self.divisor <= 0.0 {
            return Err(format!(
                "currency.divisor must be a positive number, got {}",
                self.divisor
            ));
        }
        if self.minor_code.is_empty() || self.major_code.is_empty() {
            return Err("currency codes must not be empty".into());
        }
        // Case matters: "ZAc" and "ZAC" are different codes.
        if self.minor_code == self.major_code {
            return Err(format!(
                "currency.minor_code and currency.major_code are both '{}'",
                self.minor_code
            ));
        }
        Ok(())
    }

    /// True when `currency` is the minor-unit code.
    pub fn applies_to(&self, currency: &str) -> bool {
        currency == self.minor_code
    }

    /// Normalize a currency tag together with every amount reported in it.
    ///
    /// Returns the tag to emit. Amounts are converted in place, all or none.
    pub fn normalize(&self, currency: &str, amounts: &mut [f64]) -> String {
        if !self.applies_to(currency) {
            return currency.to_string();
        }
        for amount in amounts.iter_mut() {
            *amount /= self.divisor;
        }
        self.major_code.clone()
    }
}

/// Round to two fractional digits. Exact half cents go to the even cent.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
