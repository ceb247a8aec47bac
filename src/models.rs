// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label of the synthetic category bucket for transactions with no category.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub currency: String,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub balance: Decimal, // derived, never persisted
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub category: Option<String>,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub account_id: i64,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub comment: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rate {
    pub currency: String,
    pub rate_to_usd: Decimal,
    pub updated_at: NaiveDateTime,
}

/// A live transaction joined with its account currency and category name,
/// as consumed by the statistics aggregator.
#[derive(Debug, Clone)]
pub struct StatRow {
    pub amount: Decimal,
    pub currency: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category_id: Option<i64>,
    pub category: String,
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: chrono::NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub currency: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub income_by_category: Vec<CategoryStat>,
    pub expense_by_category: Vec<CategoryStat>,
    pub daily_stats: Vec<DailyStat>,
}
