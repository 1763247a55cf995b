// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{load_categories, load_transactions};
use crate::stats::{cashflow as month_flows, month_summary};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("by-category", sub)) => by_category(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let transactions = load_transactions(conn)?;
    let categories = load_categories(conn)?;
    let s = month_summary(&transactions, &categories, month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![vec![
            month.format("%Y-%m").to_string(),
            fmt_money(&s.income),
            fmt_money(&s.expense),
            fmt_money(&s.net),
        ]];
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}

fn by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let transactions = load_transactions(conn)?;
    let categories = load_categories(conn)?;
    let s = month_summary(&transactions, &categories, month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s.by_category)? {
        let rows: Vec<Vec<String>> = s
            .by_category
            .iter()
            .map(|c| {
                vec![
                    c.category.name.clone(),
                    c.r#type.to_string(),
                    fmt_money(&c.total),
                    c.occurrences.to_string(),
                    format!("{}%", c.share),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Type", "Total", "Count", "Share"], rows)
        );
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let to = parse_month(sub.get_one::<String>("to").unwrap())?;
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let transactions = load_transactions(conn)?;
    let flows = month_flows(&transactions, to, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &flows)? {
        let rows: Vec<Vec<String>> = flows
            .iter()
            .map(|f| {
                vec![
                    f.month.format("%Y-%m").to_string(),
                    fmt_money(&f.income),
                    fmt_money(&f.expense),
                    fmt_money(&f.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}
