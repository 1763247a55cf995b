// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::{CalendarDay, WeekStart, balance_on, month_view};
use crate::db::{load_categories, load_transactions};
use crate::utils::{
    fmt_money, get_week_start, maybe_print_json, opening_or_default, parse_date, parse_month,
    pretty_table,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub)?,
        Some(("balance", sub)) => balance(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn month_days(
    conn: &Connection,
    month: NaiveDate,
    week_start: Option<WeekStart>,
) -> Result<Vec<CalendarDay>> {
    let week_start = match week_start {
        Some(w) => w,
        None => get_week_start(conn)?,
    };
    let transactions = load_transactions(conn)?;
    let categories = load_categories(conn)?;
    let opening = opening_or_default(conn, &transactions, month)?;
    tracing::debug!(%month, %week_start, opening = %opening.date, "building month view");
    Ok(month_view(
        &transactions,
        &categories,
        opening,
        month,
        week_start,
    ))
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let week_start = sub
        .get_one::<String>("week_start")
        .map(|s| s.parse::<WeekStart>())
        .transpose()?;
    let days = month_days(conn, month, week_start)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &days)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = days
        .iter()
        .filter(|d| d.in_month || !d.entries.is_empty())
        .map(|d| {
            let labels: Vec<String> = d
                .entries
                .iter()
                .map(|e| format!("{} ({})", e.transaction.label, e.category.name))
                .collect();
            vec![
                d.date.format("%a %Y-%m-%d").to_string(),
                fmt_money(&d.income),
                fmt_money(&d.expense),
                fmt_money(&d.balance),
                labels.join(", "),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Day", "Income", "Expense", "Balance", "Transactions"], rows)
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BalanceReport {
    pub date: NaiveDate,
    pub opening_date: NaiveDate,
    pub opening_balance: Decimal,
    pub balance: Decimal,
}

pub fn balance_report(conn: &Connection, date: NaiveDate) -> Result<BalanceReport> {
    let transactions = load_transactions(conn)?;
    let opening = opening_or_default(conn, &transactions, date)?;
    Ok(BalanceReport {
        date,
        opening_date: opening.date,
        opening_balance: opening.balance,
        balance: balance_on(&transactions, opening, date),
    })
}

fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let report = balance_report(conn, date)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "Balance at end of {}: {} (from {} on {})",
            report.date,
            fmt_money(&report.balance),
            fmt_money(&report.opening_balance),
            report.opening_date
        );
    }
    Ok(())
}
