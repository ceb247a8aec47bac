// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::fx::RateTable;
use crate::models::Account;
use crate::store::LedgerSource;

/// Full-history sum of an account's live transactions. An account with no
/// transactions has balance zero.
pub fn balance(ledger: &impl LedgerSource, account_id: i64) -> LedgerResult<Decimal> {
    ledger
        .live_amounts(account_id)?
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amt| acc.checked_add(amt))
        .ok_or_else(|| {
            LedgerError::InvalidInput(format!("balance of account {} overflows", account_id))
        })
}

/// Balance of `account` expressed in `currency`.
pub fn balance_in(
    ledger: &impl LedgerSource,
    rates: &RateTable,
    account: &Account,
    currency: &str,
) -> LedgerResult<Decimal> {
    let native = balance(ledger, account.id)?;
    rates.convert(native, &account.currency, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed(HashMap<i64, Vec<Decimal>>);

    impl LedgerSource for Fixed {
        fn live_amounts(&self, account_id: i64) -> LedgerResult<Vec<Decimal>> {
            Ok(self.0.get(&account_id).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn sums_signed_amounts() {
        let ledger = Fixed(HashMap::from([(
            1,
            vec![Decimal::from(100), Decimal::from(-30), Decimal::from(5)],
        )]));
        assert_eq!(balance(&ledger, 1).unwrap(), Decimal::from(75));
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let ledger = Fixed(HashMap::from([(1, vec![Decimal::MAX, Decimal::ONE])]));
        assert!(matches!(
            balance(&ledger, 1),
            Err(LedgerError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_account_is_zero() {
        let ledger = Fixed(HashMap::new());
        assert_eq!(balance(&ledger, 42).unwrap(), Decimal::ZERO);
    }
}
