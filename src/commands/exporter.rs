// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{load_categories, load_transactions};
use crate::models::{Category, TransactionRecord};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();

    let transactions = load_transactions(conn)?;
    match fmt.as_str() {
        "csv" => {
            let categories = load_categories(conn)?;
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "label",
                "value",
                "type",
                "category",
                "confirmed",
                "repeat",
                "repeat_every",
                "repeat_end_type",
                "repeat_end_date",
                "repeat_end_occurrences",
            ])?;
            for t in &transactions {
                let category = t
                    .category_id
                    .map(|_| Category::resolve(&categories, t.category_id).name)
                    .unwrap_or_default();
                let rule = t.repeat.as_ref();
                wtr.write_record([
                    t.date.to_string(),
                    t.label.clone(),
                    t.value.to_string(),
                    t.r#type.to_string(),
                    category,
                    t.confirmed.to_string(),
                    rule.map(|r| r.frequency.to_string()).unwrap_or_default(),
                    rule.map(|r| r.interval().to_string()).unwrap_or_default(),
                    rule.and_then(|r| r.end_type())
                        .map(|e| e.as_str().to_string())
                        .unwrap_or_default(),
                    rule.and_then(|r| r.end_date())
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    rule.and_then(|r| r.end_occurrences())
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<TransactionRecord> =
                transactions.iter().map(TransactionRecord::from).collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    tracing::info!(count = transactions.len(), out, "exported transactions");
    println!("Exported {} transactions to {}", transactions.len(), out);
    Ok(())
}
