// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currency conversion through the USD-anchored rate table.
//!
//! Every rate is stored as "USD per one unit of currency", so a cross rate
//! between any two currencies is `rate_to_usd[from] / rate_to_usd[to]`.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::store::RateStore;

/// A pinned copy of the rate store, loaded once and reused for every
/// conversion of a single report so one call never mixes two refreshes.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn load(store: &impl RateStore) -> LedgerResult<Self> {
        let rates = store
            .all_rates()?
            .into_iter()
            .map(|r| (r.currency, r.rate_to_usd))
            .collect();
        Ok(RateTable { rates })
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        RateTable {
            rates: pairs.into_iter().map(|(c, r)| (c.into(), r)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn contains(&self, currency: &str) -> bool {
        usable(self.rates.get(currency).copied()).is_some()
    }

    pub fn rate_to_usd(&self, currency: &str) -> LedgerResult<Decimal> {
        usable(self.rates.get(currency).copied())
            .ok_or_else(|| LedgerError::MissingRate(currency.to_string()))
    }

    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> LedgerResult<Decimal> {
        let from_rate = self.rate_to_usd(from)?;
        if from == to {
            return Ok(amount);
        }
        cross(amount, from_rate, self.rate_to_usd(to)?)
    }
}

/// Converts with two live lookups against the store, no snapshot.
pub fn convert(
    store: &impl RateStore,
    amount: Decimal,
    from: &str,
    to: &str,
) -> LedgerResult<Decimal> {
    let from_rate = usable(store.rate_to_usd(from)?)
        .ok_or_else(|| LedgerError::MissingRate(from.to_string()))?;
    if from == to {
        return Ok(amount);
    }
    let to_rate =
        usable(store.rate_to_usd(to)?).ok_or_else(|| LedgerError::MissingRate(to.to_string()))?;
    cross(amount, from_rate, to_rate)
}

// A stored rate of zero or below cannot anchor a conversion.
fn usable(rate: Option<Decimal>) -> Option<Decimal> {
    rate.filter(|r| r.is_sign_positive() && !r.is_zero())
}

fn cross(amount: Decimal, from_rate: Decimal, to_rate: Decimal) -> LedgerResult<Decimal> {
    amount
        .checked_mul(from_rate)
        .and_then(|usd| usd.checked_div(to_rate))
        .map(|d| d.normalize())
        .ok_or_else(|| LedgerError::InvalidInput(format!("amount {} overflows conversion", amount)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn table() -> RateTable {
        RateTable::from_pairs([("USD", d("1.0")), ("EUR", d("1.1")), ("JPY", d("0.0067"))])
    }

    #[test]
    fn eur_to_usd() {
        assert_eq!(table().convert(d("10"), "EUR", "USD").unwrap(), d("11"));
    }

    #[test]
    fn same_currency_is_identity() {
        let t = table();
        for x in [d("0"), d("-3.33"), d("123456.789")] {
            assert_eq!(t.convert(x, "JPY", "JPY").unwrap(), x);
        }
    }

    #[test]
    fn round_trip_is_close() {
        let t = table();
        let there = t.convert(d("250.75"), "EUR", "JPY").unwrap();
        let back = t.convert(there, "JPY", "EUR").unwrap();
        assert!((back - d("250.75")).abs() < d("0.000001"));
    }

    #[test]
    fn missing_rate_is_reported() {
        let err = table().convert(d("1"), "GBP", "USD").unwrap_err();
        assert!(matches!(err, LedgerError::MissingRate(c) if c == "GBP"));
        let err = table().convert(d("1"), "USD", "GBP").unwrap_err();
        assert!(matches!(err, LedgerError::MissingRate(c) if c == "GBP"));
    }

    #[test]
    fn same_currency_without_rate_is_missing() {
        let err = table().convert(d("5"), "GBP", "GBP").unwrap_err();
        assert!(matches!(err, LedgerError::MissingRate(c) if c == "GBP"));
    }

    #[test]
    fn zero_rate_counts_as_missing() {
        let t = RateTable::from_pairs([("USD", d("1")), ("XXX", d("0"))]);
        assert!(!t.contains("XXX"));
        assert!(t.convert(d("5"), "USD", "XXX").is_err());
    }
}
