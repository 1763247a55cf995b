// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Frequency, Recurrence, RepeatEndType, Transaction, TransactionType};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.cashcal", "Cashcal", "cashcal"));

pub const DB_ENV: &str = "CASHCAL_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cashcal.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        color TEXT NOT NULL DEFAULT '#607d8b',
        icon TEXT NOT NULL DEFAULT 'category',
        position INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER,
        label TEXT NOT NULL,
        value TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('expense','income')),
        date TEXT NOT NULL,
        confirmed INTEGER NOT NULL DEFAULT 0,
        repeat TEXT CHECK(repeat IN ('daily','weekly','monthly','yearly')),
        repeat_every INTEGER NOT NULL DEFAULT 1,
        repeat_end_type TEXT CHECK(repeat_end_type IN ('on','after')),
        repeat_end_date TEXT,
        repeat_end_occurrences INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    "#,
    )?;
    Ok(())
}

const TX_COLUMNS: &str = "id, category_id, label, value, type, date, confirmed, repeat, \
     repeat_every, repeat_end_type, repeat_end_date, repeat_end_occurrences";

fn parse_col<T: std::str::FromStr>(idx: usize, raw: &str) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_day(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_transaction(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let value: String = r.get(3)?;
    let kind: String = r.get(4)?;
    let date: String = r.get(5)?;
    let repeat: Option<String> = r.get(7)?;
    let end_type: Option<String> = r.get(9)?;
    let end_date: Option<String> = r.get(10)?;

    let repeat = Recurrence::from_parts(
        repeat.map(|s| parse_col::<Frequency>(7, &s)).transpose()?,
        r.get(8)?,
        end_type
            .map(|s| parse_col::<RepeatEndType>(9, &s))
            .transpose()?,
        end_date
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_day(10, &s))
            .transpose()?,
        r.get(11)?,
    );
    Ok(Transaction {
        id: r.get(0)?,
        category_id: r.get(1)?,
        label: r.get(2)?,
        value: parse_col::<Decimal>(3, &value)?,
        r#type: parse_col::<TransactionType>(4, &kind)?,
        date: parse_day(5, &date)?,
        confirmed: r.get(6)?,
        repeat,
    })
}

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TX_COLUMNS} FROM transactions ORDER BY date, id"
    ))?;
    let rows = stmt.query_map([], row_to_transaction)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("Invalid transaction row")?);
    }
    Ok(out)
}

pub fn load_transaction(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    let t = conn
        .query_row(
            &format!("SELECT {TX_COLUMNS} FROM transactions WHERE id=?1"),
            params![id],
            row_to_transaction,
        )
        .optional()
        .with_context(|| format!("Invalid transaction row {}", id))?;
    Ok(t)
}

fn repeat_params(
    t: &Transaction,
) -> (Option<&'static str>, i64, Option<&'static str>, Option<String>, Option<i64>) {
    match &t.repeat {
        Some(rule) => (
            Some(rule.frequency.as_str()),
            i64::from(rule.interval()),
            rule.end_type().map(|e| e.as_str()),
            rule.end_date().map(|d| d.to_string()),
            rule.end_occurrences().map(i64::from),
        ),
        None => (None, 1, None, None, None),
    }
}

pub fn insert_transaction(conn: &Connection, t: &Transaction) -> Result<i64> {
    let (repeat, every, end_type, end_date, end_occurrences) = repeat_params(t);
    conn.execute(
        "INSERT INTO transactions(category_id, label, value, type, date, confirmed, repeat, \
         repeat_every, repeat_end_type, repeat_end_date, repeat_end_occurrences) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        params![
            t.category_id,
            t.label,
            t.value.to_string(),
            t.r#type.as_str(),
            t.date.to_string(),
            t.confirmed,
            repeat,
            every,
            end_type,
            end_date,
            end_occurrences
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts `t` under its own id, replacing any row already stored there.
/// Transactions without an id are inserted as new rows.
pub fn upsert_transaction(conn: &Connection, t: &Transaction) -> Result<i64> {
    let Some(id) = t.id else {
        return insert_transaction(conn, t);
    };
    let (repeat, every, end_type, end_date, end_occurrences) = repeat_params(t);
    conn.execute(
        "INSERT INTO transactions(id, category_id, label, value, type, date, confirmed, repeat, \
         repeat_every, repeat_end_type, repeat_end_date, repeat_end_occurrences) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)
         ON CONFLICT(id) DO UPDATE SET category_id=excluded.category_id, label=excluded.label,
            value=excluded.value, type=excluded.type, date=excluded.date,
            confirmed=excluded.confirmed, repeat=excluded.repeat,
            repeat_every=excluded.repeat_every, repeat_end_type=excluded.repeat_end_type,
            repeat_end_date=excluded.repeat_end_date,
            repeat_end_occurrences=excluded.repeat_end_occurrences",
        params![
            id,
            t.category_id,
            t.label,
            t.value.to_string(),
            t.r#type.as_str(),
            t.date.to_string(),
            t.confirmed,
            repeat,
            every,
            end_type,
            end_date,
            end_occurrences
        ],
    )?;
    Ok(id)
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(n > 0)
}

pub fn set_confirmed(conn: &Connection, id: i64, confirmed: bool) -> Result<bool> {
    let n = conn.execute(
        "UPDATE transactions SET confirmed=?1 WHERE id=?2",
        params![confirmed, id],
    )?;
    Ok(n > 0)
}

pub fn load_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn
        .prepare("SELECT id, name, color, icon, position FROM categories ORDER BY position, name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            color: r.get(2)?,
            icon: r.get(3)?,
            position: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn insert_category(conn: &Connection, c: &Category) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories(name, color, icon, position) VALUES (?1,?2,?3,?4)",
        params![c.name, c.color, c.icon, c.position],
    )
    .with_context(|| format!("Could not add category '{}'", c.name))?;
    Ok(conn.last_insert_rowid())
}
