// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Users, accounts, categories and transactions. Every lookup is scoped to the
//! owning user and skips soft-deleted rows; balances are derived on read.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::info;

use crate::balance::balance;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Category, NewTransaction, Transaction, User};
use crate::store::{SqliteStore, decimal_at};
use crate::utils::{normalize_currency, now};

pub fn create_user(conn: &Connection, email: &str) -> LedgerResult<User> {
    let email = email.trim();
    if email.is_empty() {
        return Err(LedgerError::InvalidInput("email must not be empty".into()));
    }
    let created_at = now();
    conn.execute(
        "INSERT INTO users(email, created_at) VALUES (?1, ?2)",
        params![email, created_at],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        email: email.to_string(),
        created_at,
    })
}

pub fn list_users(conn: &Connection) -> LedgerResult<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, email, created_at FROM users ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(User {
            id: r.get(0)?,
            email: r.get(1)?,
            created_at: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn ensure_user(conn: &Connection, user_id: i64) -> LedgerResult<()> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE id=?1", params![user_id], |r| {
            r.get(0)
        })
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| LedgerError::not_found("user", user_id))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub fn create_account(
    conn: &Connection,
    user_id: i64,
    currency: &str,
    comment: &str,
) -> LedgerResult<Account> {
    ensure_user(conn, user_id)?;
    let currency = normalize_currency(currency)?;
    let created_at = now();
    conn.execute(
        "INSERT INTO accounts(user_id, currency, comment, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, currency, comment, created_at],
    )?;
    Ok(Account {
        id: conn.last_insert_rowid(),
        user_id,
        currency,
        comment: comment.to_string(),
        created_at,
        balance: Decimal::ZERO,
    })
}

fn account_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        user_id: r.get(1)?,
        currency: r.get(2)?,
        comment: r.get(3)?,
        created_at: r.get(4)?,
        balance: Decimal::ZERO,
    })
}

pub fn list_accounts(conn: &Connection, user_id: i64) -> LedgerResult<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, currency, comment, created_at FROM accounts
         WHERE user_id=?1 AND deleted_at IS NULL ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user_id], account_from_row)?;
    let store = SqliteStore::new(conn);
    let mut out = Vec::new();
    for row in rows {
        let mut account = row?;
        account.balance = balance(&store, account.id)?;
        out.push(account);
    }
    Ok(out)
}

pub fn get_account(conn: &Connection, id: i64, user_id: i64) -> LedgerResult<Account> {
    let mut account = conn
        .query_row(
            "SELECT id, user_id, currency, comment, created_at FROM accounts
             WHERE id=?1 AND user_id=?2 AND deleted_at IS NULL",
            params![id, user_id],
            account_from_row,
        )
        .optional()?
        .ok_or_else(|| LedgerError::not_found("account", id))?;
    account.balance = balance(&SqliteStore::new(conn), id)?;
    Ok(account)
}

pub fn update_account_comment(
    conn: &Connection,
    id: i64,
    user_id: i64,
    comment: &str,
) -> LedgerResult<()> {
    let n = conn.execute(
        "UPDATE accounts SET comment=?1 WHERE id=?2 AND user_id=?3 AND deleted_at IS NULL",
        params![comment, id, user_id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("account", id));
    }
    Ok(())
}

/// Soft-deletes the account together with all of its live transactions in a
/// single SQLite transaction. Returns how many transactions were marked.
pub fn delete_account(conn: &mut Connection, id: i64, user_id: i64) -> LedgerResult<usize> {
    let at = now();
    let tx = conn.transaction()?;
    let n = tx.execute(
        "UPDATE accounts SET deleted_at=?1 WHERE id=?2 AND user_id=?3 AND deleted_at IS NULL",
        params![at, id, user_id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("account", id));
    }
    let cascaded = tx.execute(
        "UPDATE transactions SET deleted_at=?1 WHERE account_id=?2 AND deleted_at IS NULL",
        params![at, id],
    )?;
    tx.commit()?;
    info!(account_id = id, transactions = cascaded, "Account deleted");
    Ok(cascaded)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub fn create_category(conn: &Connection, user_id: i64, name: &str) -> LedgerResult<Category> {
    ensure_user(conn, user_id)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidInput(
            "category name must not be empty".into(),
        ));
    }
    let created_at = now();
    conn.execute(
        "INSERT INTO categories(user_id, name, created_at) VALUES (?1, ?2, ?3)",
        params![user_id, name, created_at],
    )?;
    Ok(Category {
        id: conn.last_insert_rowid(),
        user_id,
        name: name.to_string(),
        created_at,
    })
}

pub fn list_categories(conn: &Connection, user_id: i64) -> LedgerResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, created_at FROM categories
         WHERE user_id=?1 AND deleted_at IS NULL ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(Category {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            created_at: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn delete_category(conn: &Connection, id: i64, user_id: i64) -> LedgerResult<()> {
    let n = conn.execute(
        "UPDATE categories SET deleted_at=?1 WHERE id=?2 AND user_id=?3 AND deleted_at IS NULL",
        params![now(), id, user_id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("category", id));
    }
    Ok(())
}

fn ensure_category(conn: &Connection, id: i64, user_id: i64) -> LedgerResult<()> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE id=?1 AND user_id=?2 AND deleted_at IS NULL",
            params![id, user_id],
            |r| r.get(0),
        )
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| LedgerError::not_found("category", id))
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

pub fn create_transaction(
    conn: &Connection,
    user_id: i64,
    new: NewTransaction,
) -> LedgerResult<Transaction> {
    get_account(conn, new.account_id, user_id)?;
    if let Some(cat) = new.category_id {
        ensure_category(conn, cat, user_id)?;
    }
    let created_at = new.created_at.unwrap_or_else(now);
    conn.execute(
        "INSERT INTO transactions(account_id, amount, category_id, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.account_id,
            new.amount.to_string(),
            new.category_id,
            new.comment,
            created_at
        ],
    )?;
    get_transaction(conn, conn.last_insert_rowid(), user_id)
}

const TX_SELECT: &str = "SELECT t.id, t.account_id, t.amount, t.category_id, c.name, t.comment, t.created_at
     FROM transactions t
     JOIN accounts a ON t.account_id=a.id
     LEFT JOIN categories c ON t.category_id=c.id";

fn tx_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        account_id: r.get(1)?,
        amount: decimal_at(r, 2)?,
        category_id: r.get(3)?,
        category: r.get(4)?,
        comment: r.get(5)?,
        created_at: r.get(6)?,
    })
}

pub fn get_transaction(conn: &Connection, id: i64, user_id: i64) -> LedgerResult<Transaction> {
    let sql = format!(
        "{TX_SELECT} WHERE t.id=?1 AND a.user_id=?2 AND t.deleted_at IS NULL AND a.deleted_at IS NULL"
    );
    conn.query_row(&sql, params![id, user_id], tx_from_row)
        .optional()?
        .ok_or_else(|| LedgerError::not_found("transaction", id))
}

/// Live transactions of one account, newest first.
pub fn list_transactions(
    conn: &Connection,
    user_id: i64,
    account_id: i64,
) -> LedgerResult<Vec<Transaction>> {
    get_account(conn, account_id, user_id)?;
    let sql = format!(
        "{TX_SELECT} WHERE t.account_id=?1 AND t.deleted_at IS NULL ORDER BY t.created_at DESC, t.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![account_id], tx_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub amount: Option<Decimal>,
    pub comment: Option<String>,
    /// `Some(None)` clears the category.
    pub category_id: Option<Option<i64>>,
}

pub fn update_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
    update: TransactionUpdate,
) -> LedgerResult<Transaction> {
    let current = get_transaction(conn, id, user_id)?;
    if let Some(Some(cat)) = update.category_id {
        ensure_category(conn, cat, user_id)?;
    }
    let amount = update.amount.unwrap_or(current.amount);
    let comment = update.comment.unwrap_or(current.comment);
    let category_id = update.category_id.unwrap_or(current.category_id);
    conn.execute(
        "UPDATE transactions SET amount=?1, comment=?2, category_id=?3 WHERE id=?4",
        params![amount.to_string(), comment, category_id, id],
    )?;
    get_transaction(conn, id, user_id)
}

pub fn delete_transaction(conn: &Connection, user_id: i64, id: i64) -> LedgerResult<()> {
    get_transaction(conn, id, user_id)?;
    conn.execute(
        "UPDATE transactions SET deleted_at=?1 WHERE id=?2 AND deleted_at IS NULL",
        params![now(), id],
    )?;
    Ok(())
}
