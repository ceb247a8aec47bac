// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fxledger::ledger::{self, TransactionUpdate};
use fxledger::models::NewTransaction;
use fxledger::{LedgerError, cli};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> (Connection, i64, i64) {
    let conn = Connection::open_in_memory().unwrap();
    fxledger::db::init_schema(&conn).unwrap();
    let ann = ledger::create_user(&conn, "ann@example.com").unwrap().id;
    let bob = ledger::create_user(&conn, "bob@example.com").unwrap().id;
    (conn, ann, bob)
}

fn new_tx(account_id: i64, amount: &str, category_id: Option<i64>) -> NewTransaction {
    NewTransaction {
        account_id,
        amount: d(amount),
        category_id,
        ..NewTransaction::default()
    }
}

#[test]
fn account_delete_cascades_to_transactions() {
    let (mut conn, ann, _) = setup();
    let acct = ledger::create_account(&conn, ann, "USD", "main").unwrap();
    for amt in ["1", "2", "3"] {
        ledger::create_transaction(&conn, ann, new_tx(acct.id, amt, None)).unwrap();
    }
    let n = ledger::delete_account(&mut conn, acct.id, ann).unwrap();
    assert_eq!(n, 3);

    let live: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE account_id=?1 AND deleted_at IS NULL",
            [acct.id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(live, 0);
    let kept: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(kept, 3);
    assert!(ledger::list_accounts(&conn, ann).unwrap().is_empty());
    assert!(matches!(
        ledger::get_account(&conn, acct.id, ann),
        Err(LedgerError::NotFound { kind: "account", .. })
    ));
}

#[test]
fn account_delete_by_non_owner_changes_nothing() {
    let (mut conn, ann, bob) = setup();
    let acct = ledger::create_account(&conn, ann, "USD", "").unwrap();
    ledger::create_transaction(&conn, ann, new_tx(acct.id, "9", None)).unwrap();
    assert!(ledger::delete_account(&mut conn, acct.id, bob).is_err());
    assert_eq!(ledger::get_account(&conn, acct.id, ann).unwrap().balance, d("9"));
}

#[test]
fn category_must_belong_to_account_owner() {
    let (conn, ann, bob) = setup();
    let acct = ledger::create_account(&conn, ann, "EUR", "").unwrap();
    let bobs = ledger::create_category(&conn, bob, "Games").unwrap();
    let err = ledger::create_transaction(&conn, ann, new_tx(acct.id, "-5", Some(bobs.id)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { kind: "category", .. }));

    let mine = ledger::create_category(&conn, ann, "Food").unwrap();
    let tx = ledger::create_transaction(&conn, ann, new_tx(acct.id, "-5", Some(mine.id))).unwrap();
    assert_eq!(tx.category.as_deref(), Some("Food"));

    ledger::delete_category(&conn, mine.id, ann).unwrap();
    assert!(ledger::create_transaction(&conn, ann, new_tx(acct.id, "-1", Some(mine.id))).is_err());
}

#[test]
fn cannot_book_on_someone_elses_account() {
    let (conn, ann, bob) = setup();
    let acct = ledger::create_account(&conn, ann, "USD", "").unwrap();
    assert!(ledger::create_transaction(&conn, bob, new_tx(acct.id, "1", None)).is_err());
    assert!(ledger::list_transactions(&conn, bob, acct.id).is_err());
}

#[test]
fn currency_is_validated_and_uppercased() {
    let (conn, ann, _) = setup();
    assert_eq!(ledger::create_account(&conn, ann, "gbp", "").unwrap().currency, "GBP");
    assert!(matches!(
        ledger::create_account(&conn, ann, "pounds", ""),
        Err(LedgerError::InvalidInput(_))
    ));
    assert!(ledger::create_account(&conn, 999, "USD", "").is_err());
}

#[test]
fn update_and_delete_transaction() {
    let (conn, ann, _) = setup();
    let acct = ledger::create_account(&conn, ann, "USD", "").unwrap();
    let food = ledger::create_category(&conn, ann, "Food").unwrap();
    let tx = ledger::create_transaction(&conn, ann, new_tx(acct.id, "-10", Some(food.id))).unwrap();

    let updated = ledger::update_transaction(
        &conn,
        ann,
        tx.id,
        TransactionUpdate {
            amount: Some(d("-12.5")),
            comment: Some("lunch".into()),
            category_id: Some(None),
        },
    )
    .unwrap();
    assert_eq!(updated.amount, d("-12.5"));
    assert_eq!(updated.comment, "lunch");
    assert_eq!(updated.category_id, None);
    assert_eq!(updated.created_at, tx.created_at);

    ledger::delete_transaction(&conn, ann, tx.id).unwrap();
    assert!(ledger::list_transactions(&conn, ann, acct.id).unwrap().is_empty());
    assert!(ledger::delete_transaction(&conn, ann, tx.id).is_err());
}

#[test]
fn transactions_listed_newest_first() {
    let (conn, ann, _) = setup();
    let acct = ledger::create_account(&conn, ann, "USD", "").unwrap();
    for (amt, at) in [("1", "2025-01-02"), ("2", "2025-01-03"), ("3", "2025-01-01")] {
        let mut t = new_tx(acct.id, amt, None);
        t.created_at = Some(fxledger::utils::parse_timestamp(at).unwrap());
        ledger::create_transaction(&conn, ann, t).unwrap();
    }
    let amounts: Vec<String> = ledger::list_transactions(&conn, ann, acct.id)
        .unwrap()
        .iter()
        .map(|t| t.amount.to_string())
        .collect();
    assert_eq!(amounts, vec!["2", "1", "3"]);
}

#[test]
fn cli_accepts_negative_amounts() {
    let matches = cli::build_cli().get_matches_from([
        "fxledger", "--user", "1", "tx", "add", "--account", "2", "--amount", "-30",
    ]);
    assert_eq!(matches.get_one::<i64>("user").copied(), Some(1));
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("add", add_m)) = tx_m.subcommand() {
            assert_eq!(add_m.get_one::<String>("amount").unwrap(), "-30");
            assert_eq!(add_m.get_one::<i64>("account").copied(), Some(2));
        } else {
            panic!("no add subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}
