// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashcal::calendar::{Opening, balance_on, days_between};
use cashcal::models::{Frequency, Recurrence, Transaction, TransactionType};
use cashcal::recurrence::{balance_as_of, occurrences_in_range};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tx(kind: TransactionType, value: i64, date: NaiveDate) -> Transaction {
    Transaction::new("t", Decimal::from(value), kind, date)
}

#[test]
fn weekly_expense_over_four_weeks() {
    let t = tx(TransactionType::Expense, 100, d(2023, 1, 2))
        .with_repeat(Recurrence::new(Frequency::Weekly, 1));
    let window = days_between(d(2023, 1, 1), d(2023, 2, 5));
    let bal = balance_as_of(&[t], Decimal::ZERO, &window, d(2023, 1, 23));
    assert_eq!(bal, Decimal::from(-400));
}

#[test]
fn empty_window_or_early_date_keeps_start_balance() {
    let t = tx(TransactionType::Income, 10, d(2023, 1, 2))
        .with_repeat(Recurrence::new(Frequency::Daily, 1));
    let start = Decimal::from(75);
    assert_eq!(balance_as_of(&[t.clone()], start, &[], d(2023, 3, 1)), start);
    let window = days_between(d(2023, 1, 5), d(2023, 1, 10));
    assert_eq!(balance_as_of(&[t.clone()], start, &window, d(2023, 1, 5)), start);
    assert_eq!(balance_as_of(&[t], start, &window, d(2023, 1, 1)), start);
}

#[test]
fn one_off_on_window_start_is_excluded() {
    let window = days_between(d(2023, 1, 1), d(2023, 1, 31));
    let on_start = tx(TransactionType::Income, 100, d(2023, 1, 1));
    let on_date = tx(TransactionType::Income, 7, d(2023, 1, 5));
    let later = tx(TransactionType::Income, 1000, d(2023, 1, 6));
    let bal = balance_as_of(&[on_start, on_date, later], Decimal::ZERO, &window, d(2023, 1, 5));
    assert_eq!(bal, Decimal::from(7));
}

#[test]
fn monthly_income_counts_each_matching_day() {
    let t = tx(TransactionType::Income, 50, d(2022, 12, 15))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1));
    let window = days_between(d(2023, 1, 1), d(2023, 3, 31));
    let bal = balance_as_of(&[t], Decimal::ZERO, &window, d(2023, 3, 20));
    assert_eq!(bal, Decimal::from(150));
}

#[test]
fn end_date_stops_contributions() {
    let t = tx(TransactionType::Expense, 10, d(2023, 1, 2))
        .with_repeat(Recurrence::new(Frequency::Weekly, 1).until(d(2023, 1, 9)));
    let window = days_between(d(2023, 1, 1), d(2023, 1, 31));
    assert_eq!(
        balance_as_of(&[t.clone()], Decimal::ZERO, &window, d(2023, 1, 31)),
        Decimal::from(-20)
    );

    let late_window = days_between(d(2023, 2, 1), d(2023, 2, 28));
    assert_eq!(
        balance_as_of(&[t], Decimal::ZERO, &late_window, d(2023, 2, 28)),
        Decimal::ZERO
    );
}

#[test]
fn balance_ignores_occurrence_count_limit() {
    let t = tx(TransactionType::Expense, 10, d(2023, 1, 2))
        .with_repeat(Recurrence::new(Frequency::Weekly, 1).times(2));
    let window = days_between(d(2023, 1, 1), d(2023, 1, 31));
    assert_eq!(
        balance_as_of(&[t.clone()], Decimal::ZERO, &window, d(2023, 1, 31)),
        Decimal::from(-50)
    );
    assert_eq!(occurrences_in_range(&t, d(2023, 1, 1), d(2023, 1, 31)).len(), 2);
}

#[test]
fn fortnightly_income_counts_every_other_week() {
    let t = tx(TransactionType::Income, 100, d(2023, 1, 2))
        .with_repeat(Recurrence::new(Frequency::Weekly, 2));
    let window = days_between(d(2023, 1, 1), d(2023, 2, 28));
    assert_eq!(
        balance_as_of(&[t], Decimal::ZERO, &window, d(2023, 2, 28)),
        Decimal::from(500)
    );
}

#[test]
fn income_only_balance_never_decreases() {
    let daily = tx(TransactionType::Income, 5, d(2023, 1, 3))
        .with_repeat(Recurrence::new(Frequency::Daily, 1));
    let monthly = tx(TransactionType::Income, 40, d(2023, 1, 31))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1));
    let all = vec![daily, monthly];
    let window = days_between(d(2023, 1, 1), d(2023, 3, 31));
    let mut previous = Decimal::ZERO;
    for day in &window {
        let bal = balance_as_of(&all, Decimal::ZERO, &window, *day);
        assert!(bal >= previous, "balance dropped on {}", day);
        previous = bal;
    }
}

#[test]
fn balance_from_opening() {
    let salary = tx(TransactionType::Income, 2000, d(2023, 1, 25))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1));
    let rent = tx(TransactionType::Expense, 800, d(2023, 1, 1))
        .with_repeat(Recurrence::new(Frequency::Monthly, 1));
    let all = vec![salary, rent];
    let opening = Opening {
        date: d(2022, 12, 31),
        balance: Decimal::from(1000),
    };
    assert_eq!(balance_on(&all, opening, d(2023, 3, 1)), Decimal::from(2600));
    assert_eq!(balance_on(&all, opening, d(2022, 12, 1)), Decimal::from(1000));

    let default = Opening::before_first(&all, d(2030, 1, 1));
    assert_eq!(default.date, d(2022, 12, 31));
    assert_eq!(default.balance, Decimal::ZERO);
    assert_eq!(Opening::before_first(&[], d(2030, 1, 1)).date, d(2030, 1, 1));
}
