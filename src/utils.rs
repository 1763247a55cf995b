// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::{Opening, WeekStart};
use crate::models::Transaction;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "cashcal/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/cashcal)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// First day of a `YYYY-MM` month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn fmt_signed(t: &Transaction) -> String {
    fmt_money(&t.signed_value())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name.trim()], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name.trim()))?;
    Ok(id)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_week_start(conn: &Connection) -> Result<WeekStart> {
    match get_setting(conn, "week_start")? {
        Some(s) => Ok(s.parse::<WeekStart>()?),
        None => Ok(WeekStart::default()),
    }
}

pub fn set_week_start(conn: &Connection, week_start: WeekStart) -> Result<()> {
    set_setting(conn, "week_start", week_start.as_str())
}

/// Stored baseline, if one was configured.
pub fn get_opening(conn: &Connection) -> Result<Option<Opening>> {
    let date = get_setting(conn, "opening_date")?;
    let balance = get_setting(conn, "opening_balance")?;
    match (date, balance) {
        (Some(d), Some(b)) => Ok(Some(Opening {
            date: parse_date(&d).context("Invalid opening_date setting")?,
            balance: parse_decimal(&b).context("Invalid opening_balance setting")?,
        })),
        _ => Ok(None),
    }
}

pub fn set_opening(conn: &Connection, opening: Opening) -> Result<()> {
    set_setting(conn, "opening_date", &opening.date.to_string())?;
    set_setting(conn, "opening_balance", &opening.balance.to_string())
}

/// Stored baseline, or a zero balance just before the first transaction.
pub fn opening_or_default(
    conn: &Connection,
    transactions: &[Transaction],
    fallback: NaiveDate,
) -> Result<Opening> {
    Ok(get_opening(conn)?.unwrap_or_else(|| Opening::before_first(transactions, fallback)))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
