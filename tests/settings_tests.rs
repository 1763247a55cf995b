// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashcal::calendar::WeekStart;
use cashcal::commands::{calendar, categories, settings};
use cashcal::models::{Frequency, Recurrence, Transaction, TransactionType};
use cashcal::{cli, db, utils};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["cashcal"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("config", m)) => settings::handle(conn, m),
        Some(("category", m)) => categories::handle(conn, m),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn week_start_setting_drives_month_grid() {
    let conn = setup();
    assert_eq!(utils::get_week_start(&conn).unwrap(), WeekStart::Monday);
    run(&conn, &["config", "set-week-start", "--day", "sunday"]).unwrap();
    assert_eq!(utils::get_week_start(&conn).unwrap(), WeekStart::Sunday);

    let days = calendar::month_days(&conn, d(2023, 1, 1), None).unwrap();
    assert_eq!(days.first().unwrap().date, d(2023, 1, 1));
    assert_eq!(days.len(), 35);
    let days = calendar::month_days(&conn, d(2023, 1, 1), Some(WeekStart::Monday)).unwrap();
    assert_eq!(days.len(), 42);
}

#[test]
fn opening_balance_setting_feeds_balance_report() {
    let conn = setup();
    let rent = Transaction::new("Rent", Decimal::from(800), TransactionType::Expense, d(2023, 1, 1))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1));
    db::insert_transaction(&conn, &rent).unwrap();

    let report = calendar::balance_report(&conn, d(2023, 3, 15)).unwrap();
    assert_eq!(report.opening_date, d(2022, 12, 31));
    assert_eq!(report.balance, Decimal::from(-2400));

    run(
        &conn,
        &["config", "set-opening", "--date", "2023-01-31", "--balance", "-150.25"],
    )
    .unwrap();
    let report = calendar::balance_report(&conn, d(2023, 3, 15)).unwrap();
    assert_eq!(report.opening_date, d(2023, 1, 31));
    assert_eq!(report.opening_balance, Decimal::new(-15025, 2));
    assert_eq!(report.balance, Decimal::new(-175025, 2));
}

#[test]
fn categories_are_validated_and_ordered() {
    let conn = setup();
    run(&conn, &["category", "add", "--name", "Food"]).unwrap();
    run(&conn, &["category", "add", "--name", "Bills", "--color", "#FF5722"]).unwrap();
    run(&conn, &["category", "add", "--name", "Alpha", "--position", "0"]).unwrap();
    assert!(run(&conn, &["category", "add", "--name", "Bad", "--color", "red"]).is_err());
    assert!(run(&conn, &["category", "add", "--name", "Food"]).is_err());

    let names: Vec<String> = db::load_categories(&conn)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Food", "Bills"]);

    run(&conn, &["category", "rm", "--name", "Food"]).unwrap();
    assert!(run(&conn, &["category", "rm", "--name", "Food"]).is_err());
}
