// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income/expense aggregation over a date window, normalized into one
//! reporting currency.
//!
//! Each transaction is converted on its own before it is added to any bucket,
//! and the same converted value feeds the totals, the category breakdown and
//! the daily breakdown, so the three always agree.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::fx::RateTable;
use crate::models::{CategoryStat, DailyStat, StatRow, Statistics, UNCATEGORIZED};
use crate::store::StatisticsSource;

#[derive(Debug, Clone)]
pub struct StatsQuery<'a> {
    pub user_id: i64,
    pub from: &'a str,
    pub to: &'a str,
    pub account_id: Option<i64>,
    pub currency: &'a str,
}

/// Turns an inclusive `[from, to]` pair of `YYYY-MM-DD` dates into the
/// half-open timestamp window `[from 00:00, to+1 00:00)`.
pub fn parse_range(from: &str, to: &str) -> LedgerResult<(NaiveDateTime, NaiveDateTime)> {
    let from = parse_day(from)?;
    let to = parse_day(to)?;
    if from > to {
        return Err(LedgerError::InvalidRange(format!(
            "from {} is after to {}",
            from, to
        )));
    }
    let end = to
        .succ_opt()
        .ok_or_else(|| LedgerError::InvalidRange(format!("{} is out of range", to)))?;
    Ok((from.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN)))
}

fn parse_day(s: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::InvalidRange(format!("invalid date '{}', expected YYYY-MM-DD", s))
    })
}

pub fn get_statistics(
    source: &impl StatisticsSource,
    rates: &RateTable,
    query: &StatsQuery<'_>,
) -> LedgerResult<Statistics> {
    let (start, end) = parse_range(query.from, query.to)?;
    if !rates.contains(query.currency) {
        return Err(LedgerError::MissingRate(query.currency.to_string()));
    }

    let rows = source.live_transactions(query.user_id, start, end, query.account_id)?;
    debug!(
        user_id = query.user_id,
        rows = rows.len(),
        currency = query.currency,
        "aggregating statistics"
    );

    let mut agg = Aggregator::default();
    for row in &rows {
        let converted = rates.convert(row.amount, &row.currency, query.currency)?;
        agg.add(row, converted)?;
    }
    Ok(agg.finish(query.currency))
}

#[derive(Default)]
struct Bucket {
    name: String,
    total: Decimal,
    count: u64,
}

#[derive(Default)]
struct Aggregator {
    total_income: Decimal,
    total_expense: Decimal,
    income: BTreeMap<Option<i64>, Bucket>,
    expense: BTreeMap<Option<i64>, Bucket>,
    daily: BTreeMap<NaiveDate, (Decimal, Decimal)>,
}

impl Aggregator {
    fn add(&mut self, row: &StatRow, converted: Decimal) -> LedgerResult<()> {
        let day = self
            .daily
            .entry(row.created_at.date())
            .or_insert((Decimal::ZERO, Decimal::ZERO));

        let (side, value) = match row.amount.cmp(&Decimal::ZERO) {
            Ordering::Greater => {
                self.total_income = sum(self.total_income, converted)?;
                day.0 = sum(day.0, converted)?;
                (&mut self.income, converted)
            }
            Ordering::Less => {
                let value = converted.abs();
                self.total_expense = sum(self.total_expense, value)?;
                day.1 = sum(day.1, value)?;
                (&mut self.expense, value)
            }
            // zero amounts still mark the day but belong to neither side
            Ordering::Equal => return Ok(()),
        };

        let bucket = side.entry(row.category_id).or_insert_with(|| Bucket {
            name: row
                .category_name
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            ..Bucket::default()
        });
        bucket.total = sum(bucket.total, value)?;
        bucket.count += 1;
        Ok(())
    }

    fn finish(self, currency: &str) -> Statistics {
        Statistics {
            currency: currency.to_string(),
            total_income: self.total_income,
            total_expense: self.total_expense,
            income_by_category: ranked(self.income),
            expense_by_category: ranked(self.expense),
            daily_stats: self
                .daily
                .into_iter()
                .map(|(date, (income, expense))| DailyStat {
                    date,
                    income,
                    expense,
                })
                .collect(),
        }
    }
}

fn sum(acc: Decimal, value: Decimal) -> LedgerResult<Decimal> {
    acc.checked_add(value)
        .ok_or_else(|| LedgerError::InvalidInput(format!("total {} + {} overflows", acc, value)))
}

// Largest total first; ties fall back to name so output is stable.
fn ranked(buckets: BTreeMap<Option<i64>, Bucket>) -> Vec<CategoryStat> {
    let mut out: Vec<CategoryStat> = buckets
        .into_iter()
        .map(|(id, b)| CategoryStat {
            category_id: id,
            category: b.name,
            total: b.total,
            count: b.count,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    out
}
