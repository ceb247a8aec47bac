// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let user = ledger::create_user(conn, email)?;
            println!("Added user {} ({})", user.id, user.email);
        }
        Some(("list", _)) => {
            let data = ledger::list_users(conn)?
                .into_iter()
                .map(|u| vec![u.id.to_string(), u.email, u.created_at.to_string()])
                .collect();
            println!("{}", pretty_table(&["Id", "Email", "Created"], data));
        }
        _ => {}
    }
    Ok(())
}
