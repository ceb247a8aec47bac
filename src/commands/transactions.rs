// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, TransactionUpdate};
use crate::models::{NewTransaction, Transaction};
use crate::utils::{maybe_print_json, parse_decimal, parse_timestamp, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::delete_transaction(conn, user, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, user: i64, sub: &clap::ArgMatches) -> Result<()> {
    let created_at = match sub.get_one::<String>("at") {
        Some(s) => Some(parse_timestamp(s)?),
        None => None,
    };
    let new = NewTransaction {
        account_id: *sub.get_one::<i64>("account").unwrap(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        category_id: sub.get_one::<i64>("category").copied(),
        comment: sub.get_one::<String>("comment").cloned().unwrap_or_default(),
        created_at,
    };
    let tx = ledger::create_transaction(conn, user, new)?;
    println!(
        "Recorded {} on {} (acct: {}, id: {})",
        tx.amount, tx.created_at, tx.account_id, tx.id
    );
    Ok(())
}

fn list(conn: &Connection, user: i64, sub: &clap::ArgMatches) -> Result<()> {
    let account = *sub.get_one::<i64>("account").unwrap();
    let data = ledger::list_transactions(conn, user, account)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        println!("{}", tx_table(&data));
    }
    Ok(())
}

fn edit(conn: &Connection, user: i64, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => Some(parse_decimal(s)?),
        None => None,
    };
    let category_id = if sub.get_flag("clear-category") {
        Some(None)
    } else {
        sub.get_one::<i64>("category").map(|c| Some(*c))
    };
    let update = TransactionUpdate {
        amount,
        comment: sub.get_one::<String>("comment").cloned(),
        category_id,
    };
    let tx = ledger::update_transaction(conn, user, id, update)?;
    println!("{}", tx_table(std::slice::from_ref(&tx)));
    Ok(())
}

fn tx_table(rows: &[Transaction]) -> comfy_table::Table {
    let data = rows
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.created_at.to_string(),
                t.amount.to_string(),
                t.category.clone().unwrap_or_default(),
                t.comment.clone(),
            ]
        })
        .collect();
    pretty_table(&["Id", "Date", "Amount", "Category", "Comment"], data)
}
