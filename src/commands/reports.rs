// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::balance_in;
use crate::fx::RateTable;
use crate::ledger;
use crate::models::{CategoryStat, Statistics};
use crate::statistics::{StatsQuery, get_statistics};
use crate::store::SqliteStore;
use crate::utils::{
    fmt_money, get_reporting_currency, maybe_print_json, normalize_currency, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, user: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, user, sub)?,
        Some(("stats", sub)) => stats(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BalanceRow {
    pub account_id: i64,
    pub currency: String,
    pub balance: rust_decimal::Decimal,
}

/// Balances of every live account of `user`, converted into `currency` when
/// one is given. All conversions share one rate snapshot.
pub fn balance_rows(conn: &Connection, user: i64, currency: Option<&str>) -> Result<Vec<BalanceRow>> {
    let accounts = ledger::list_accounts(conn, user)?;
    let Some(target) = currency else {
        return Ok(accounts
            .into_iter()
            .map(|a| BalanceRow {
                account_id: a.id,
                currency: a.currency,
                balance: a.balance,
            })
            .collect());
    };
    let store = SqliteStore::new(conn);
    let rates = RateTable::load(&store)?;
    let mut out = Vec::with_capacity(accounts.len());
    for a in &accounts {
        out.push(BalanceRow {
            account_id: a.id,
            currency: target.to_string(),
            balance: balance_in(&store, &rates, a, target)?,
        });
    }
    Ok(out)
}

fn balances(conn: &Connection, user: i64, sub: &clap::ArgMatches) -> Result<()> {
    let target = match sub.get_one::<String>("currency") {
        Some(c) => Some(normalize_currency(c)?),
        None => None,
    };
    let data = balance_rows(conn, user, target.as_deref())?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.account_id.to_string(),
                    r.currency.clone(),
                    format!("{:.2}", r.balance),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Account", "CCY", "Balance"], rows));
    }
    Ok(())
}

fn stats(conn: &Connection, user: i64, sub: &clap::ArgMatches) -> Result<()> {
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => normalize_currency(c)?,
        None => get_reporting_currency(conn)?,
    };
    let query = StatsQuery {
        user_id: user,
        from: sub.get_one::<String>("from").unwrap(),
        to: sub.get_one::<String>("to").unwrap(),
        account_id: sub.get_one::<i64>("account").copied(),
        currency: &currency,
    };
    let store = SqliteStore::new(conn);
    let rates = RateTable::load(&store)?;
    let stats = get_statistics(&store, &rates, &query)?;
    if !maybe_print_json(sub.get_flag("json"), &stats)? {
        print_stats(&stats);
    }
    Ok(())
}

fn category_rows(rows: &[CategoryStat], ccy: &str) -> Vec<Vec<String>> {
    rows.iter()
        .map(|c| vec![c.category.clone(), fmt_money(&c.total, ccy), c.count.to_string()])
        .collect()
}

fn print_stats(stats: &Statistics) {
    let ccy = &stats.currency;
    println!(
        "Income: {}   Expense: {}",
        fmt_money(&stats.total_income, ccy),
        fmt_money(&stats.total_expense, ccy)
    );
    println!(
        "{}",
        pretty_table(
            &["Income category", "Total", "Count"],
            category_rows(&stats.income_by_category, ccy)
        )
    );
    println!(
        "{}",
        pretty_table(
            &["Expense category", "Total", "Count"],
            category_rows(&stats.expense_by_category, ccy)
        )
    );
    let daily = stats
        .daily_stats
        .iter()
        .map(|d| {
            vec![
                d.date.to_string(),
                fmt_money(&d.income, ccy),
                fmt_money(&d.expense, ccy),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Day", "Income", "Expense"], daily));
}
