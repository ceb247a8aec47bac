// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::refresh::{ExchangeRateApiFeed, refresh_once, spawn_updater};
use crate::store::{RateStore, SqliteStore};
use crate::utils::{
    maybe_print_json, normalize_currency, parse_decimal, pretty_table, set_reporting_currency,
};
use anyhow::Result;
use rusqlite::Connection;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

pub async fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-currency", sub)) => {
            let ccy = normalize_currency(sub.get_one::<String>("currency").unwrap())?;
            set_reporting_currency(conn, &ccy)?;
            println!("Reporting currency set to {}", ccy);
        }
        Some(("list", sub)) => list_rates(conn, sub.get_flag("json"))?,
        Some(("convert", sub)) => convert_amount(conn, sub)?,
        Some(("refresh", _)) => {
            let feed = ExchangeRateApiFeed::new(&cfg.feed_url, cfg.feed_api_key.clone())?;
            let report = refresh_once(conn, &feed).await;
            match report.feed_error {
                Some(e) => println!("Rates unchanged: {}", e),
                None => println!(
                    "Updated {} rates ({} skipped, {} failed)",
                    report.updated.len(),
                    report.skipped.len(),
                    report.failed.len()
                ),
            }
        }
        Some(("watch", sub)) => {
            let period = sub
                .get_one::<u64>("interval")
                .filter(|s| **s > 0)
                .map(|s| Duration::from_secs(*s))
                .unwrap_or(cfg.refresh_interval);
            watch_rates(cfg, period).await?;
        }
        _ => {}
    }
    Ok(())
}

fn list_rates(conn: &Connection, json: bool) -> Result<()> {
    let rates = SqliteStore::new(conn).all_rates()?;
    if !maybe_print_json(json, &rates)? {
        let data = rates
            .into_iter()
            .map(|r| vec![r.currency, r.rate_to_usd.to_string(), r.updated_at.to_string()])
            .collect();
        println!("{}", pretty_table(&["Currency", "USD per unit", "Updated"], data));
    }
    Ok(())
}

fn convert_amount(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = normalize_currency(sub.get_one::<String>("from").unwrap())?;
    let to = normalize_currency(sub.get_one::<String>("to").unwrap())?;
    let res = crate::fx::convert(&SqliteStore::new(conn), amount, &from, &to)?;
    println!("{} {} -> {:.4} {}", amount, from, res, to);
    Ok(())
}

/// Runs the periodic updater on its own connection until Ctrl-C.
async fn watch_rates(cfg: &AppConfig, period: Duration) -> Result<()> {
    let conn = crate::db::open_or_init(&cfg.db_path)?;
    let feed = ExchangeRateApiFeed::new(&cfg.feed_url, cfg.feed_api_key.clone())?;
    let (stop_tx, stop_rx) = watch::channel(false);
    let updater = spawn_updater(conn, feed, period, stop_rx);
    println!("Refreshing rates every {}s; press Ctrl-C to stop.", period.as_secs());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    let _ = stop_tx.send(true);
    updater.await?;
    Ok(())
}
