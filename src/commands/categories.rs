// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let cat = ledger::create_category(conn, user, name)?;
            println!("Added category {} '{}'", cat.id, cat.name);
        }
        Some(("list", _)) => {
            let data = ledger::list_categories(conn, user)?
                .into_iter()
                .map(|c| vec![c.id.to_string(), c.name])
                .collect();
            println!("{}", pretty_table(&["Id", "Category"], data));
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::delete_category(conn, id, user)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
