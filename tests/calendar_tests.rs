// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashcal::calendar::{Opening, WeekStart, balance_on, month_end, month_view, month_window};
use cashcal::models::{Category, Frequency, Recurrence, Transaction, TransactionType};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn housing() -> Category {
    Category {
        id: 1,
        name: "Housing".into(),
        color: "#3f51b5".into(),
        icon: "home".into(),
        position: 0,
    }
}

fn ledger() -> Vec<Transaction> {
    let salary = Transaction::new("Salary", Decimal::from(2000), TransactionType::Income, d(2023, 1, 25))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1));
    let rent = Transaction::new("Rent", Decimal::from(800), TransactionType::Expense, d(2023, 1, 1))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1))
        .with_category(1);
    vec![salary, rent]
}

#[test]
fn february_2021_fits_four_monday_weeks() {
    let window = month_window(d(2021, 2, 14), WeekStart::Monday);
    assert_eq!(window.len(), 28);
    assert_eq!(window.first(), Some(&d(2021, 2, 1)));
    assert_eq!(window.last(), Some(&d(2021, 2, 28)));
}

#[test]
fn january_2023_window_depends_on_week_start() {
    let monday = month_window(d(2023, 1, 1), WeekStart::Monday);
    assert_eq!(monday.first(), Some(&d(2022, 12, 26)));
    assert_eq!(monday.last(), Some(&d(2023, 2, 5)));
    assert_eq!(monday.len(), 42);

    let sunday = month_window(d(2023, 1, 1), WeekStart::Sunday);
    assert_eq!(sunday.first(), Some(&d(2023, 1, 1)));
    assert_eq!(sunday.last(), Some(&d(2023, 2, 4)));
    assert_eq!(sunday.len(), 35);
}

#[test]
fn windows_are_whole_weeks_covering_the_month() {
    for month in 1..=12 {
        for week_start in [WeekStart::Monday, WeekStart::Sunday] {
            let first = d(2024, month, 1);
            let window = month_window(first, week_start);
            assert_eq!(window.len() % 7, 0, "{} {}", first, week_start);
            assert!(window.contains(&first));
            assert!(window.contains(&month_end(first)));
            assert_eq!(week_start.column(window[0]), 0);
        }
    }
}

#[test]
fn month_view_carries_balances_from_opening() {
    let categories = vec![housing()];
    let opening = Opening {
        date: d(2022, 12, 31),
        balance: Decimal::from(1000),
    };
    let days = month_view(&ledger(), &categories, opening, d(2023, 1, 1), WeekStart::Monday);
    let on = |date: NaiveDate| days.iter().find(|day| day.date == date).unwrap();

    assert_eq!(on(d(2022, 12, 26)).balance, Decimal::from(1000));
    assert!(!on(d(2022, 12, 26)).in_month);
    assert_eq!(on(d(2023, 1, 1)).balance, Decimal::from(200));
    assert_eq!(on(d(2023, 1, 24)).balance, Decimal::from(200));
    assert_eq!(on(d(2023, 1, 25)).balance, Decimal::from(2200));
    assert_eq!(on(d(2023, 2, 1)).balance, Decimal::from(1400));
    assert!(!on(d(2023, 2, 1)).in_month);

    let rent_day = on(d(2023, 1, 1));
    assert_eq!(rent_day.expense, Decimal::from(800));
    assert_eq!(rent_day.income, Decimal::ZERO);
    assert_eq!(rent_day.entries.len(), 1);
    assert_eq!(rent_day.entries[0].category.name, "Housing");

    let payday = on(d(2023, 1, 25));
    assert_eq!(payday.entries[0].category.name, "Uncategorized");
    assert_eq!(payday.entries[0].transaction.date, d(2023, 1, 25));
}

#[test]
fn earlier_opening_gives_same_balances() {
    let categories = vec![housing()];
    let late = Opening {
        date: d(2022, 12, 31),
        balance: Decimal::from(1000),
    };
    let early = Opening {
        date: d(2022, 11, 30),
        balance: Decimal::from(1000),
    };
    let a = month_view(&ledger(), &categories, late, d(2023, 1, 1), WeekStart::Monday);
    let b = month_view(&ledger(), &categories, early, d(2023, 1, 1), WeekStart::Monday);
    for (x, y) in a.iter().zip(&b).filter(|(x, _)| x.date.month() == 1) {
        assert_eq!(x.balance, y.balance, "{}", x.date);
    }
}

#[test]
fn week_start_parsing() {
    assert_eq!("monday".parse::<WeekStart>().unwrap(), WeekStart::Monday);
    assert_eq!(" Sun ".parse::<WeekStart>().unwrap(), WeekStart::Sunday);
    assert!("friday".parse::<WeekStart>().is_err());
    assert_eq!(WeekStart::default(), WeekStart::Monday);
}

#[test]
fn balances_before_a_later_opening_are_derived_backwards() {
    let rent = Transaction::new("Rent", Decimal::from(800), TransactionType::Expense, d(2023, 1, 1))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1))
        .with_category(1);
    let all = vec![rent];
    let opening = Opening {
        date: d(2023, 6, 30),
        balance: Decimal::from(5000),
    };

    assert_eq!(balance_on(&all, opening, d(2022, 12, 31)), Decimal::from(9800));
    assert_eq!(balance_on(&all, opening, d(2023, 2, 28)), Decimal::from(8200));
    assert_eq!(balance_on(&all, opening, d(2023, 3, 31)), Decimal::from(7400));
    assert_eq!(balance_on(&all, opening, d(2023, 6, 30)), Decimal::from(5000));
    assert_eq!(balance_on(&all, opening, d(2023, 7, 1)), Decimal::from(4200));

    let days = month_view(&all, &[housing()], opening, d(2023, 3, 1), WeekStart::Monday);
    let on = |date: NaiveDate| days.iter().find(|day| day.date == date).unwrap();
    assert_eq!(days[0].date, d(2023, 2, 27));
    assert_eq!(on(d(2023, 2, 27)).balance, Decimal::from(8200));
    assert_eq!(on(d(2023, 3, 1)).balance, Decimal::from(7400));
    assert_eq!(on(d(2023, 3, 31)).balance, Decimal::from(7400));
    assert_eq!(on(d(2023, 4, 1)).balance, Decimal::from(6600));
}
