// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://v6.exchangerate-api.com/v6";
pub const DEFAULT_REFRESH_SECS: u64 = 3600;

/// Process-level settings read from the environment. Per-database settings
/// such as the reporting currency live in the `settings` table instead.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub feed_url: String,
    pub feed_api_key: Option<String>,
    pub refresh_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match get("FXLEDGER_DB").filter(|v| !v.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => crate::db::default_db_path()?,
        };
        let feed_url = get("EXCHANGE_RATE_API_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        let feed_api_key = get("EXCHANGE_RATE_API_KEY").filter(|v| !v.is_empty());
        let secs = match get("FXLEDGER_REFRESH_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("FXLEDGER_REFRESH_SECS '{}' is not a number", v))?,
            None => DEFAULT_REFRESH_SECS,
        };
        anyhow::ensure!(secs > 0, "FXLEDGER_REFRESH_SECS must be positive");
        Ok(AppConfig {
            db_path,
            feed_url,
            feed_api_key,
            refresh_interval: Duration::from_secs(secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn env_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("FXLEDGER_DB", "/tmp/x.sqlite"),
            ("EXCHANGE_RATE_API_KEY", "k"),
            ("EXCHANGE_RATE_API_URL", "http://localhost:9"),
            ("FXLEDGER_REFRESH_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.sqlite"));
        assert_eq!(cfg.feed_api_key.as_deref(), Some("k"));
        assert_eq!(cfg.feed_url, "http://localhost:9");
        assert_eq!(cfg.refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn defaults_and_bad_interval() {
        let cfg = AppConfig::from_lookup(lookup(&[("FXLEDGER_DB", "a.sqlite")])).unwrap();
        assert_eq!(cfg.feed_url, DEFAULT_FEED_URL);
        assert!(cfg.feed_api_key.is_none());
        assert_eq!(cfg.refresh_interval, Duration::from_secs(DEFAULT_REFRESH_SECS));

        assert!(
            AppConfig::from_lookup(lookup(&[("FXLEDGER_DB", "a"), ("FXLEDGER_REFRESH_SECS", "0")]))
                .is_err()
        );
        assert!(
            AppConfig::from_lookup(lookup(&[("FXLEDGER_DB", "a"), ("FXLEDGER_REFRESH_SECS", "x")]))
                .is_err()
        );
    }
}
