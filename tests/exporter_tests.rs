// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashcal::commands::{exporter, importer};
use cashcal::models::{Frequency, Recurrence, Transaction, TransactionRecord, TransactionType};
use cashcal::{cli, db};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::tempdir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn seeded() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO categories(id, name) VALUES (1, 'Housing')", [])
        .unwrap();
    let rent = Transaction::new("Rent", Decimal::from(800), TransactionType::Expense, d(2023, 1, 31))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1).times(12))
        .with_category(1);
    let gift = Transaction::new("Gift", Decimal::new(4999, 2), TransactionType::Income, d(2023, 2, 14));
    db::insert_transaction(&conn, &rent).unwrap();
    db::insert_transaction(&conn, &gift).unwrap();
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "cashcal", "export", "transactions", "--format", format, "--out", out,
    ]);
    let (_, export_m) = matches.subcommand().unwrap();
    exporter::handle(conn, export_m)
}

#[test]
fn export_json_uses_flat_record_shape() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.json");
    export(&conn, "json", out.to_str().unwrap()).unwrap();

    let raw = std::fs::read_to_string(&out).unwrap();
    let v: Value = serde_json::from_str(&raw).unwrap();
    let items = v.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["transactionDate"], "2023-01-31");
    assert_eq!(items[0]["repeat"], "monthly");
    assert_eq!(items[0]["repeatEndType"], "after");
    assert_eq!(items[0]["repeatEndOccurrences"], 12);
    assert_eq!(items[1]["type"], "income");
    assert!(items[1]["repeat"].is_null());

    let records: Vec<TransactionRecord> = serde_json::from_str(&raw).unwrap();
    let back: Vec<Transaction> = records.into_iter().map(Transaction::from).collect();
    assert_eq!(back, db::load_transactions(&conn).unwrap());
}

#[test]
fn exported_csv_imports_into_fresh_database() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    export(&conn, "CSV", out.to_str().unwrap()).unwrap();

    let raw = std::fs::read_to_string(&out).unwrap();
    let mut lines = raw.lines();
    assert!(lines.next().unwrap().starts_with("date,label,value,type,category"));
    assert_eq!(
        lines.next().unwrap(),
        "2023-01-31,Rent,800,expense,Housing,false,monthly,1,after,,12"
    );

    let mut fresh = Connection::open_in_memory().unwrap();
    db::init_schema(&fresh).unwrap();
    fresh.execute("INSERT INTO categories(name) VALUES ('Housing')", []).unwrap();
    assert_eq!(importer::import_csv(&mut fresh, out.to_str().unwrap()).unwrap(), 2);
    let strip = |ts: Vec<Transaction>| -> Vec<Transaction> {
        ts.into_iter().map(|t| Transaction { id: None, ..t }).collect()
    };
    assert_eq!(
        strip(db::load_transactions(&fresh).unwrap()),
        strip(db::load_transactions(&conn).unwrap())
    );
}

#[test]
fn unknown_format_is_rejected() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.xml");
    assert!(export(&conn, "xml", out.to_str().unwrap()).is_err());
}
