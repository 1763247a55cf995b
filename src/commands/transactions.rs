// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{
    delete_transaction, insert_transaction, load_categories, load_transaction, load_transactions,
    set_confirmed,
};
use crate::models::{Category, Frequency, Recurrence, RepeatEnd, Transaction, TransactionType};
use crate::recurrence::{filter_visible_on, occurrences_in_range};
use crate::utils::{
    fmt_money, fmt_signed, id_for_category, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if !delete_transaction(conn, id)? {
                bail!("Transaction {} not found", id);
            }
            println!("Removed transaction {}", id);
        }
        Some(("confirm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let confirmed = !sub.get_flag("undo");
            if !set_confirmed(conn, id, confirmed)? {
                bail!("Transaction {} not found", id);
            }
            println!(
                "Transaction {} marked {}",
                id,
                if confirmed { "confirmed" } else { "unconfirmed" }
            );
        }
        Some(("occurrences", sub)) => occurrences(conn, sub)?,
        Some(("day", sub)) => day(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Reads a transaction from `tx add` arguments without storing it.
pub fn build_transaction(conn: &Connection, sub: &clap::ArgMatches) -> Result<Transaction> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let label = sub.get_one::<String>("label").unwrap().trim();
    let value = parse_decimal(sub.get_one::<String>("value").unwrap())?;
    let kind = sub.get_one::<String>("type").unwrap().parse::<TransactionType>()?;

    let mut t = Transaction::new(label, value, kind, date);
    t.confirmed = sub.get_flag("confirmed");
    if let Some(cat) = sub.get_one::<String>("category") {
        t.category_id = Some(id_for_category(conn, cat)?);
    }
    if let Some(freq) = sub.get_one::<String>("repeat") {
        let every = *sub.get_one::<u32>("every").unwrap_or(&1);
        let mut rule = Recurrence::new(freq.parse::<Frequency>()?, every);
        if let Some(until) = sub.get_one::<String>("until") {
            rule.end = Some(RepeatEnd::On(parse_date(until)?));
        } else if let Some(times) = sub.get_one::<u32>("times") {
            rule.end = Some(RepeatEnd::After(*times));
        }
        t.repeat = Some(rule);
    }
    Ok(t)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let t = build_transaction(conn, sub)?;
    t.validate()?;
    if let Some(rule) = t.repeat.as_ref().filter(|r| r.may_clamp(t.date)) {
        tracing::warn!(date = %t.date, rule = %rule, "series anchored near month end");
        eprintln!(
            "Warning: {} has no day {} in some months; those occurrences fall on the month's last day",
            rule, t.date.format("%-d")
        );
    }
    let id = insert_transaction(conn, &t)?;
    tracing::info!(id, "transaction recorded");
    println!(
        "Recorded {} {} on {} '{}' (id {})",
        t.r#type,
        fmt_money(&t.value),
        t.date,
        t.label,
        id
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub label: String,
    pub r#type: String,
    pub value: String,
    pub category: String,
    pub repeat: String,
    pub confirmed: bool,
}

impl TransactionRow {
    fn new(t: &Transaction, categories: &[Category]) -> Self {
        TransactionRow {
            id: t.id.unwrap_or_default(),
            date: t.date.to_string(),
            label: t.label.clone(),
            r#type: t.r#type.to_string(),
            value: fmt_signed(t),
            category: Category::resolve(categories, t.category_id).name,
            repeat: t.repeat.map(|r| r.to_string()).unwrap_or_default(),
            confirmed: t.confirmed,
        }
    }
}

fn print_rows(rows: Vec<TransactionRow>) {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date,
                r.label,
                r.value,
                r.category,
                r.repeat,
                if r.confirmed { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Label", "Value", "Category", "Repeat", "Confirmed"],
            rows,
        )
    );
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        print_rows(data);
    }
    Ok(())
}

/// Stored transactions, newest anchor first, filtered by `tx list` arguments.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let categories = load_categories(conn)?;
    let month = sub.get_one::<String>("month").map(|m| m.trim().to_string());
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => Some(id_for_category(conn, c)?),
        None => None,
    };

    let mut transactions = load_transactions(conn)?;
    transactions.retain(|t| {
        month
            .as_deref()
            .is_none_or(|m| t.date.format("%Y-%m").to_string() == m)
            && category_id.is_none_or(|c| t.category_id == Some(c))
    });
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        transactions.truncate(*limit);
    }
    Ok(transactions
        .iter()
        .map(|t| TransactionRow::new(t, &categories))
        .collect())
}

/// Occurrence dates of stored transaction `id` within `[from, to]`.
pub fn occurrence_dates(
    conn: &Connection,
    id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    let Some(t) = load_transaction(conn, id)? else {
        bail!("Transaction {} not found", id);
    };
    Ok(occurrences_in_range(&t, from, to))
}

fn occurrences(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let from = parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = parse_date(sub.get_one::<String>("to").unwrap())?;
    let dates = occurrence_dates(conn, id, from, to)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dates)? {
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, d)| vec![(i + 1).to_string(), d.to_string(), d.format("%a").to_string()])
            .collect();
        println!("{}", pretty_table(&["#", "Date", "Day"], rows));
    }
    Ok(())
}

/// Rows for every transaction visible on `date`, smallest value first.
pub fn day_rows(conn: &Connection, date: NaiveDate) -> Result<Vec<TransactionRow>> {
    let categories = load_categories(conn)?;
    let transactions = load_transactions(conn)?;
    Ok(filter_visible_on(&transactions, date)
        .iter()
        .map(|t| TransactionRow::new(t, &categories))
        .collect())
}

fn day(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let data = day_rows(conn, date)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        print_rows(data);
    }
    Ok(())
}
