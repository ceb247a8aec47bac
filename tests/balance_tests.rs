// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fxledger::balance::{balance, balance_in};
use fxledger::fx::RateTable;
use fxledger::ledger;
use fxledger::models::NewTransaction;
use fxledger::store::SqliteStore;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> (Connection, i64) {
    let conn = Connection::open_in_memory().unwrap();
    fxledger::db::init_schema(&conn).unwrap();
    let user = ledger::create_user(&conn, "ann@example.com").unwrap();
    (conn, user.id)
}

fn record(conn: &Connection, user: i64, account_id: i64, amount: &str) -> i64 {
    ledger::create_transaction(
        conn,
        user,
        NewTransaction {
            account_id,
            amount: d(amount),
            ..NewTransaction::default()
        },
    )
    .unwrap()
    .id
}

#[test]
fn balance_is_sum_of_live_transactions() {
    let (conn, user) = setup();
    let acct = ledger::create_account(&conn, user, "usd", "wallet").unwrap();
    for amt in ["100", "-30", "5"] {
        record(&conn, user, acct.id, amt);
    }
    let store = SqliteStore::new(&conn);
    assert_eq!(balance(&store, acct.id).unwrap(), d("75"));
    assert_eq!(ledger::get_account(&conn, acct.id, user).unwrap().balance, d("75"));
}

#[test]
fn new_account_has_zero_balance() {
    let (conn, user) = setup();
    let acct = ledger::create_account(&conn, user, "EUR", "").unwrap();
    let store = SqliteStore::new(&conn);
    assert_eq!(balance(&store, acct.id).unwrap(), Decimal::ZERO);
}

#[test]
fn soft_deleted_transactions_never_count() {
    let (conn, user) = setup();
    let acct = ledger::create_account(&conn, user, "USD", "").unwrap();
    record(&conn, user, acct.id, "10.50");
    let gone = record(&conn, user, acct.id, "-1000");
    record(&conn, user, acct.id, "0.25");
    ledger::delete_transaction(&conn, user, gone).unwrap();

    let store = SqliteStore::new(&conn);
    assert_eq!(balance(&store, acct.id).unwrap(), d("10.75"));
}

#[test]
fn balance_converted_to_another_currency() {
    let (conn, user) = setup();
    let acct = ledger::create_account(&conn, user, "EUR", "").unwrap();
    record(&conn, user, acct.id, "20");
    let store = SqliteStore::new(&conn);
    let rates = RateTable::from_pairs([("USD", d("1.0")), ("EUR", d("1.1"))]);
    let acct = ledger::get_account(&conn, acct.id, user).unwrap();
    assert_eq!(balance_in(&store, &rates, &acct, "USD").unwrap(), d("22"));
    assert!(balance_in(&store, &rates, &acct, "GBP").is_err());
}

#[test]
fn balance_report_pins_one_snapshot_per_call() {
    use fxledger::commands::reports::balance_rows;
    use fxledger::store::RateStore;

    let (conn, user) = setup();
    let eur = ledger::create_account(&conn, user, "EUR", "").unwrap();
    let usd = ledger::create_account(&conn, user, "USD", "").unwrap();
    record(&conn, user, eur.id, "100");
    record(&conn, user, usd.id, "-40");

    let native = balance_rows(&conn, user, None).unwrap();
    assert_eq!(native[0].currency, "EUR");
    assert_eq!(native[0].balance, d("100"));

    // no rates yet
    assert!(balance_rows(&conn, user, Some("USD")).is_err());

    let store = SqliteStore::new(&conn);
    let at = fxledger::utils::now();
    store.upsert_rate("USD", d("1"), at).unwrap();
    store.upsert_rate("EUR", d("1.1"), at).unwrap();
    let rows = balance_rows(&conn, user, Some("USD")).unwrap();
    assert_eq!(rows[0].balance, d("110"));
    assert_eq!(rows[1].balance, d("-40"));
    assert!(rows.iter().all(|r| r.currency == "USD"));
}

#[test]
fn overflowing_balance_is_an_error_not_a_panic() {
    let (conn, user) = setup();
    let acct = ledger::create_account(&conn, user, "USD", "").unwrap();
    record(&conn, user, acct.id, "50000000000000000000000000000");
    record(&conn, user, acct.id, "50000000000000000000000000000");
    let store = SqliteStore::new(&conn);
    let err = balance(&store, acct.id).unwrap_err();
    assert!(matches!(err, fxledger::LedgerError::InvalidInput(_)));
}
