// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::Account;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, user: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap();
            let comment = sub.get_one::<String>("comment").unwrap();
            let account = ledger::create_account(conn, user, ccy, comment)?;
            println!("Added account {} ({})", account.id, account.currency);
        }
        Some(("list", sub)) => {
            let accounts = ledger::list_accounts(conn, user)?;
            if !maybe_print_json(sub.get_flag("json"), &accounts)? {
                println!("{}", account_table(&accounts));
            }
        }
        Some(("show", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let account = ledger::get_account(conn, id, user)?;
            if !maybe_print_json(sub.get_flag("json"), &account)? {
                println!("{}", account_table(std::slice::from_ref(&account)));
            }
        }
        Some(("comment", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let text = sub.get_one::<String>("text").unwrap();
            ledger::update_account_comment(conn, id, user, text)?;
            println!("Updated account {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = ledger::delete_account(conn, id, user)?;
            println!("Removed account {} ({} transactions)", id, n);
        }
        _ => {}
    }
    Ok(())
}

fn account_table(accounts: &[Account]) -> comfy_table::Table {
    let data = accounts
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.currency.clone(),
                format!("{:.2}", a.balance),
                a.comment.clone(),
                a.created_at.to_string(),
            ]
        })
        .collect();
    pretty_table(&["Id", "CCY", "Balance", "Comment", "Created"], data)
}
