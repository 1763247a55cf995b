// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{insert_transaction, load_categories, upsert_transaction};
use crate::models::{
    Frequency, Recurrence, RepeatEndType, Transaction, TransactionRecord, TransactionType,
};
use crate::utils::{id_for_category, parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, HashSet, hash_map::Entry};
use std::path::Path;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let is_json = Path::new(path)
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            let n = if is_json {
                import_json(conn, path)?
            } else {
                import_csv(conn, path)?
            };
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn optional(raw: Option<&str>) -> Option<&str> {
    raw.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Imports rows of
/// `date,label,value,type,category,confirmed,repeat,repeat_every,repeat_end_type,repeat_end_date,repeat_end_occurrences`.
/// Only the first four columns are required. All rows are stored or none.
pub fn import_csv(conn: &mut Connection, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut category_cache: HashMap<String, i64> = HashMap::new();
    let mut count = 0;

    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = line + 2;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let label = rec.get(1).context("label missing")?.trim();
        let value_raw = rec.get(2).context("value missing")?.trim();
        let kind_raw = rec.get(3).context("type missing")?.trim();

        let date = parse_date(date_raw).with_context(|| format!("Row {}: invalid date", row))?;
        let value = parse_decimal(value_raw)
            .with_context(|| format!("Row {}: invalid value for {}", row, label))?;
        let kind = kind_raw
            .parse::<TransactionType>()
            .with_context(|| format!("Row {}: invalid type", row))?;

        let mut t = Transaction::new(label, value, kind, date);
        if let Some(category) = optional(rec.get(4)) {
            let id = match category_cache.entry(category.to_string()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => *entry.insert(id_for_category(&tx, category)?),
            };
            t.category_id = Some(id);
        }
        t.confirmed = optional(rec.get(5))
            .is_some_and(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        let frequency = optional(rec.get(6))
            .map(str::parse::<Frequency>)
            .transpose()
            .with_context(|| format!("Row {}: invalid repeat", row))?;
        let every = optional(rec.get(7))
            .map(str::parse::<i64>)
            .transpose()
            .with_context(|| format!("Row {}: invalid repeat_every", row))?;
        let end_type = optional(rec.get(8))
            .map(str::parse::<RepeatEndType>)
            .transpose()
            .with_context(|| format!("Row {}: invalid repeat_end_type", row))?;
        let end_date = optional(rec.get(9))
            .map(parse_date)
            .transpose()
            .with_context(|| format!("Row {}: invalid repeat_end_date", row))?;
        let end_occurrences = optional(rec.get(10))
            .map(str::parse::<i64>)
            .transpose()
            .with_context(|| format!("Row {}: invalid repeat_end_occurrences", row))?;
        t.repeat = Recurrence::from_parts(frequency, every, end_type, end_date, end_occurrences);

        t.validate().with_context(|| format!("Row {}", row))?;
        insert_transaction(&tx, &t)?;
        count += 1;
    }
    tx.commit()?;
    tracing::info!(count, path, "imported CSV transactions");
    Ok(count)
}

pub fn import_json(conn: &mut Connection, path: &str) -> Result<usize> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Open JSON {}", path))?;
    let records: Vec<TransactionRecord> =
        serde_json::from_str(&raw).with_context(|| format!("Parse JSON {}", path))?;
    store_records(conn, records)
}

/// Stores flat records, replacing rows that share an id, and returns how
/// many were stored.
///
/// Records that fail validation are skipped with a warning. Unknown category
/// ids are cleared.
pub fn store_records(conn: &mut Connection, records: Vec<TransactionRecord>) -> Result<usize> {
    let known: HashSet<i64> = load_categories(conn)?.into_iter().map(|c| c.id).collect();
    let tx = conn.transaction()?;
    let mut stored = 0;
    let mut rejected = 0;
    for record in records {
        let mut t = Transaction::from(record);
        if let Err(err) = t.validate() {
            tracing::warn!(id = ?t.id, label = %t.label, %err, "skipping invalid record");
            rejected += 1;
            continue;
        }
        if let Some(id) = t.category_id.filter(|id| !known.contains(id)) {
            tracing::warn!(category_id = id, label = %t.label, "unknown category, storing as uncategorized");
            t.category_id = None;
        }
        upsert_transaction(&tx, &t)?;
        stored += 1;
    }
    tx.commit()?;
    if rejected > 0 {
        eprintln!("Skipped {} invalid records", rejected);
    }
    tracing::info!(stored, rejected, "stored transaction records");
    Ok(stored)
}
