// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month grids and the balances shown on them.

use crate::error::ValidationError;
use crate::models::{Category, Transaction, TransactionType};
use crate::recurrence::{balance_as_of, filter_visible_on};
use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekStart::Monday => "monday",
            WeekStart::Sunday => "sunday",
        }
    }

    /// Column of `date` in a grid starting on this weekday.
    pub fn column(&self, date: NaiveDate) -> u32 {
        match self {
            WeekStart::Monday => date.weekday().num_days_from_monday(),
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekStart {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekStart::Monday),
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            _ => Err(ValidationError::UnknownVariant {
                kind: "week start",
                value: s.to_string(),
            }),
        }
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

/// Every day from `from` to `to`, inclusive. Empty when `to < from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    if to < from {
        return Vec::new();
    }
    from.iter_days().take_while(|d| *d <= to).collect()
}

/// Days shown for the month containing `month`: the whole month padded with
/// the neighbouring days needed to complete the first and last weeks.
pub fn month_window(month: NaiveDate, week_start: WeekStart) -> Vec<NaiveDate> {
    let first = first_of_month(month);
    let last = month_end(first);
    let start = first
        .checked_sub_days(Days::new(u64::from(week_start.column(first))))
        .unwrap_or(first);
    let end = last
        .checked_add_days(Days::new(u64::from(6 - week_start.column(last))))
        .unwrap_or(last);
    days_between(start, end)
}

/// A known balance: the account held `balance` at the end of `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Opening {
    pub date: NaiveDate,
    pub balance: Decimal,
}

impl Opening {
    /// Zero on the day before the earliest transaction, or on `fallback` when
    /// there are none.
    pub fn before_first(transactions: &[Transaction], fallback: NaiveDate) -> Opening {
        let date = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .and_then(|d| d.pred_opt())
            .unwrap_or(fallback);
        Opening {
            date,
            balance: Decimal::ZERO,
        }
    }
}

/// Balance at the end of `date`, derived from `opening`.
///
/// Later dates add the occurrences in `(opening.date, date]`. Earlier dates
/// take back the occurrences in `(date, opening.date]`.
pub fn balance_on(transactions: &[Transaction], opening: Opening, date: NaiveDate) -> Decimal {
    if date <= opening.date {
        let since = balance_as_of(
            transactions,
            Decimal::ZERO,
            std::slice::from_ref(&date),
            opening.date,
        );
        return opening.balance - since;
    }
    balance_as_of(
        transactions,
        opening.balance,
        std::slice::from_ref(&opening.date),
        date,
    )
}

/// One visible occurrence together with the category it is filed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEntry {
    pub transaction: Transaction,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub entries: Vec<DayEntry>,
    pub income: Decimal,
    pub expense: Decimal,
    /// Balance at the end of the day.
    pub balance: Decimal,
}

pub fn month_view(
    transactions: &[Transaction],
    categories: &[Category],
    opening: Opening,
    month: NaiveDate,
    week_start: WeekStart,
) -> Vec<CalendarDay> {
    let window = month_window(month, week_start);
    let Some(&first) = window.first() else {
        return Vec::new();
    };
    let start_balance = balance_on(transactions, opening, first);
    let month = first_of_month(month);

    window
        .iter()
        .map(|&date| {
            let entries: Vec<DayEntry> = filter_visible_on(transactions, date)
                .into_iter()
                .map(|t| DayEntry {
                    category: Category::resolve(categories, t.category_id),
                    transaction: t,
                })
                .collect();
            let total = |kind: TransactionType| -> Decimal {
                entries
                    .iter()
                    .filter(|e| e.transaction.r#type == kind)
                    .map(|e| e.transaction.value)
                    .sum()
            };
            let balance = balance_as_of(transactions, start_balance, &window, date);
            CalendarDay {
                date,
                in_month: first_of_month(date) == month,
                income: total(TransactionType::Income),
                expense: total(TransactionType::Expense),
                entries,
                balance,
            }
        })
        .collect()
}
