// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{RateStore, SqliteStore};
use crate::utils::{get_reporting_currency, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

/// Currencies in use (live accounts plus the reporting currency) that have no
/// row in the rate store.
pub fn missing_rates(conn: &Connection) -> Result<Vec<String>> {
    let mut used = Vec::<String>::new();
    let mut stmt = conn
        .prepare("SELECT DISTINCT currency FROM accounts WHERE deleted_at IS NULL ORDER BY currency")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    for row in rows {
        used.push(row?);
    }
    let reporting = get_reporting_currency(conn)?;
    if !used.contains(&reporting) {
        used.push(reporting);
    }

    let store = SqliteStore::new(conn);
    let mut missing = Vec::new();
    for ccy in used {
        if store.rate_to_usd(&ccy)?.is_none() {
            missing.push(ccy);
        }
    }
    Ok(missing)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows: Vec<Vec<String>> = missing_rates(conn)?
        .into_iter()
        .map(|c| vec!["missing_fx".into(), c])
        .collect();

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
