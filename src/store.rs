// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Narrow storage interfaces used by the balance, statistics and refresh code,
//! plus their SQLite implementation.

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::LedgerResult;
use crate::models::{Rate, StatRow};

pub trait RateStore {
    fn rate_to_usd(&self, currency: &str) -> LedgerResult<Option<Decimal>>;
    fn all_rates(&self) -> LedgerResult<Vec<Rate>>;
    fn upsert_rate(&self, currency: &str, rate_to_usd: Decimal, at: NaiveDateTime)
    -> LedgerResult<()>;
}

pub trait LedgerSource {
    /// Amounts of every live transaction booked against `account_id`.
    fn live_amounts(&self, account_id: i64) -> LedgerResult<Vec<Decimal>>;
}

pub trait StatisticsSource {
    /// Live transactions of live accounts owned by `user_id` with
    /// `start <= created_at < end`, optionally restricted to one account.
    fn live_transactions(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        account_id: Option<i64>,
    ) -> LedgerResult<Vec<StatRow>>;
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore { conn }
    }
}

/// Reads a Decimal stored as TEXT.
pub(crate) fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl RateStore for SqliteStore<'_> {
    fn rate_to_usd(&self, currency: &str) -> LedgerResult<Option<Decimal>> {
        let rate = self
            .conn
            .query_row(
                "SELECT rate_to_usd FROM rates WHERE currency=?1",
                params![currency],
                |r| decimal_at(r, 0),
            )
            .optional()?;
        Ok(rate)
    }

    fn all_rates(&self) -> LedgerResult<Vec<Rate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT currency, rate_to_usd, updated_at FROM rates ORDER BY currency")?;
        let rows = stmt.query_map([], |r| {
            Ok(Rate {
                currency: r.get(0)?,
                rate_to_usd: decimal_at(r, 1)?,
                updated_at: r.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn upsert_rate(
        &self,
        currency: &str,
        rate_to_usd: Decimal,
        at: NaiveDateTime,
    ) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO rates(currency, rate_to_usd, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(currency) DO UPDATE SET rate_to_usd=excluded.rate_to_usd, updated_at=excluded.updated_at",
            params![currency, rate_to_usd.to_string(), at],
        )?;
        Ok(())
    }
}

impl LedgerSource for SqliteStore<'_> {
    fn live_amounts(&self, account_id: i64) -> LedgerResult<Vec<Decimal>> {
        let mut stmt = self.conn.prepare(
            "SELECT amount FROM transactions WHERE account_id=?1 AND deleted_at IS NULL",
        )?;
        let rows = stmt.query_map(params![account_id], |r| decimal_at(r, 0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl StatisticsSource for SqliteStore<'_> {
    fn live_transactions(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        account_id: Option<i64>,
    ) -> LedgerResult<Vec<StatRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.amount, a.currency, t.category_id, c.name, t.created_at
             FROM transactions t
             JOIN accounts a ON t.account_id=a.id
             LEFT JOIN categories c ON t.category_id=c.id
             WHERE a.user_id=?1
               AND t.deleted_at IS NULL
               AND a.deleted_at IS NULL
               AND t.created_at >= ?2
               AND t.created_at < ?3
               AND (?4 IS NULL OR t.account_id=?4)
             ORDER BY t.created_at, t.id",
        )?;
        let rows = stmt.query_map(params![user_id, start, end, account_id], |r| {
            Ok(StatRow {
                amount: decimal_at(r, 0)?,
                currency: r.get(1)?,
                category_id: r.get(2)?,
                category_name: r.get(3)?,
                created_at: r.get(4)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
