// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rate store refresh: fetch "units per USD" quotes from the feed, invert them
//! into USD-per-unit and upsert them one currency at a time.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::store::{RateStore, SqliteStore};
use crate::utils::now;

const UA: &str = concat!("fxledger/", env!("CARGO_PKG_VERSION"));

/// Feed payload: `conversion_rates` maps a currency to how many units of it
/// one USD buys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedResponse {
    pub result: String,
    #[serde(default)]
    pub conversion_rates: HashMap<String, f64>,
}

impl FeedResponse {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}

#[async_trait]
pub trait RateFeed: Send + Sync {
    async fn fetch_rates(&self) -> LedgerResult<FeedResponse>;
}

/// exchangerate-api.com v6 client: `GET {base}/{key}/latest/USD`.
pub struct ExchangeRateApiFeed {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExchangeRateApiFeed {
    pub fn new(base_url: &str, api_key: Option<String>) -> LedgerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(UA)
            .build()
            .map_err(|e| LedgerError::FeedUnavailable(e.to_string()))?;
        Ok(ExchangeRateApiFeed {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl RateFeed for ExchangeRateApiFeed {
    #[instrument(name = "RateFeedFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_rates(&self) -> LedgerResult<FeedResponse> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LedgerError::FeedUnavailable("EXCHANGE_RATE_API_KEY is not set".into())
            })?;
        let url = format!("{}/{}/latest/USD", self.base_url, key);
        debug!("Requesting exchange rates");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LedgerError::FeedUnavailable(e.without_url().to_string()))?;
        response
            .json::<FeedResponse>()
            .await
            .map_err(|e| LedgerError::FeedUnavailable(format!("malformed feed body: {}", e)))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub feed_error: Option<String>,
}

/// Applies one feed result to the store. Never fails: a feed error leaves the
/// store untouched, and a currency that cannot be stored is logged and skipped
/// without aborting the rest of the batch.
pub fn refresh_rates(
    store: &impl RateStore,
    fetched: LedgerResult<FeedResponse>,
    at: NaiveDateTime,
) -> RefreshReport {
    let mut report = RefreshReport::default();

    let feed = match fetched {
        Ok(feed) if feed.is_success() => feed,
        Ok(feed) => {
            let err = LedgerError::FeedUnavailable(format!("feed returned result '{}'", feed.result));
            warn!(error = %err, "Skipping rate refresh");
            report.feed_error = Some(err.to_string());
            return report;
        }
        Err(err) => {
            warn!(error = %err, "Skipping rate refresh");
            report.feed_error = Some(err.to_string());
            return report;
        }
    };

    let mut quotes: Vec<(String, f64)> = feed.conversion_rates.into_iter().collect();
    quotes.sort_by(|a, b| a.0.cmp(&b.0));

    for (raw_ccy, units_per_usd) in quotes {
        let currency = raw_ccy.trim().to_uppercase();
        if currency.is_empty() {
            debug!(raw = %raw_ccy, "Blank currency code, skipping");
            report.skipped.push(raw_ccy);
            continue;
        }
        let Some(rate_to_usd) = invert(units_per_usd) else {
            debug!(currency = %currency, units_per_usd, "No usable rate, skipping");
            report.skipped.push(currency);
            continue;
        };
        match store.upsert_rate(&currency, rate_to_usd, at) {
            Ok(()) => report.updated.push(currency),
            Err(e) => {
                let err = LedgerError::PartialUpsertFailure {
                    currency: currency.clone(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Rate not stored");
                report.failed.push(currency);
            }
        }
    }

    info!(
        updated = report.updated.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Exchange rates refreshed"
    );
    report
}

// units-per-USD -> USD-per-unit; non-positive or non-finite quotes are unusable
fn invert(units_per_usd: f64) -> Option<Decimal> {
    if !units_per_usd.is_finite() || units_per_usd <= 0.0 {
        return None;
    }
    let quote = Decimal::try_from(units_per_usd).ok()?;
    if quote.is_zero() {
        return None;
    }
    Decimal::ONE.checked_div(quote).map(|d| d.normalize())
}

/// One fetch-and-apply cycle against `conn`.
pub async fn refresh_once(conn: &Connection, feed: &dyn RateFeed) -> RefreshReport {
    let fetched = feed.fetch_rates().await;
    refresh_rates(&SqliteStore::new(conn), fetched, now())
}

/// Runs a refresh immediately and then every `period` until `shutdown`
/// changes or its sender is dropped. Shutdown also abandons a fetch that is
/// still in flight.
pub fn spawn_updater<F>(
    conn: Connection,
    feed: F,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    F: RateFeed + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_secs = period.as_secs(), "Rate updater started");
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {}
            }
            let fetched = tokio::select! {
                _ = shutdown.changed() => break,
                fetched = feed.fetch_rates() => fetched,
            };
            refresh_rates(&SqliteStore::new(&conn), fetched, now());
        }
        info!("Rate updater stopped");
    })
}
