// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Projection of repeating transactions onto calendar days.
//!
//! Every function here is pure: the same transactions and dates always give
//! the same answer, and nothing reads the clock or touches storage.
//!
//! Occurrence `k` of a series is the anchor date moved forward by
//! `k * every` periods, always measured from the anchor. A monthly or yearly
//! step landing on a day the target month does not have rolls back to that
//! month's last day, so a series anchored on Jan 31 runs Jan 31, Feb 28,
//! Mar 31, Apr 30 and so on.

use crate::models::{Frequency, Recurrence, Transaction};
use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;

/// Date of occurrence `n` (0-based) of a series anchored on `anchor`, or
/// `None` once the calendar runs out.
pub fn nth_occurrence(anchor: NaiveDate, rule: &Recurrence, n: u32) -> Option<NaiveDate> {
    let steps = u64::from(rule.interval()) * u64::from(n);
    match rule.frequency {
        Frequency::Daily => anchor.checked_add_days(Days::new(steps)),
        Frequency::Weekly => anchor.checked_add_days(Days::new(steps.checked_mul(7)?)),
        Frequency::Monthly => anchor.checked_add_months(Months::new(u32::try_from(steps).ok()?)),
        Frequency::Yearly => {
            let months = u32::try_from(steps.checked_mul(12)?).ok()?;
            anchor.checked_add_months(Months::new(months))
        }
    }
}

// Whole periods from `anchor` to `date`. Months and years are counted by
// calendar position, not by elapsed days.
fn elapsed_periods(anchor: NaiveDate, frequency: Frequency, date: NaiveDate) -> i64 {
    match frequency {
        Frequency::Daily => (date - anchor).num_days(),
        Frequency::Weekly => (date - anchor).num_days().div_euclid(7),
        Frequency::Monthly => {
            i64::from(date.year() - anchor.year()) * 12 + i64::from(date.month())
                - i64::from(anchor.month())
        }
        Frequency::Yearly => i64::from(date.year() - anchor.year()),
    }
}

/// Whether `transaction` has an occurrence on `date`.
///
/// A one-off transaction occurs only on its own date. A repeating one occurs
/// on every date produced by its rule from the anchor onwards, up to and
/// including an `on` end date. Count-bounded series (`after N`) are not cut
/// off here; [`occurrences_in_range`] applies that limit.
pub fn occurs_on(transaction: &Transaction, date: NaiveDate) -> bool {
    let anchor = transaction.date;
    let Some(rule) = &transaction.repeat else {
        return date == anchor;
    };
    if date < anchor {
        return false;
    }
    if rule.end_date().is_some_and(|end| date > end) {
        return false;
    }
    let elapsed = elapsed_periods(anchor, rule.frequency, date);
    let every = i64::from(rule.interval());
    if elapsed % every != 0 {
        return false;
    }
    u32::try_from(elapsed / every)
        .ok()
        .and_then(|n| nth_occurrence(anchor, rule, n))
        == Some(date)
}

/// Ascending occurrence dates of a single transaction.
///
/// The iterator is `Clone`, so a copy taken before advancing replays the
/// same dates. It ends after the last occurrence of a bounded series and
/// never yields the same date twice.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    transaction: &'a Transaction,
    next: u32,
    limit: Option<u32>,
    finished: bool,
}

impl<'a> Occurrences<'a> {
    fn new(transaction: &'a Transaction) -> Self {
        Self {
            transaction,
            next: 0,
            limit: transaction.repeat.and_then(|r| r.end_occurrences()),
            finished: false,
        }
    }

    // Jumps to an occurrence shortly before `from`. Skipped occurrences still
    // count toward an `after N` limit because the index is kept.
    fn skip_to_near(mut self, from: NaiveDate) -> Self {
        let Some(rule) = &self.transaction.repeat else {
            return self;
        };
        let anchor = self.transaction.date;
        if from > anchor {
            let periods = elapsed_periods(anchor, rule.frequency, from) / i64::from(rule.interval());
            let index = u32::try_from((periods - 1).max(0)).unwrap_or(u32::MAX);
            self.next = self.next.max(index);
        }
        self
    }

    fn ignoring_count_limit(mut self) -> Self {
        self.limit = None;
        self
    }
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.finished {
            return None;
        }
        let transaction = self.transaction;
        let Some(rule) = &transaction.repeat else {
            self.finished = true;
            return Some(transaction.date);
        };
        if self.limit.is_some_and(|limit| self.next >= limit) {
            self.finished = true;
            return None;
        }
        let date = match nth_occurrence(transaction.date, rule, self.next) {
            Some(date) if rule.end_date().is_none_or(|end| date <= end) => date,
            _ => {
                self.finished = true;
                return None;
            }
        };
        match self.next.checked_add(1) {
            Some(next) => self.next = next,
            None => self.finished = true,
        }
        Some(date)
    }
}

/// Every occurrence of `transaction`, honoring both kinds of end condition.
pub fn occurrences(transaction: &Transaction) -> Occurrences<'_> {
    Occurrences::new(transaction)
}

/// Occurrence dates of `transaction` within `[start, end]`, ascending.
///
/// An `after N` limit counts from the very first occurrence, so occurrences
/// before `start` use up part of it. An empty vector is returned when
/// `end < start`.
pub fn occurrences_in_range(
    transaction: &Transaction,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    occurrences(transaction)
        .skip_to_near(start)
        .skip_while(|d| *d < start)
        .take_while(|d| *d <= end)
        .collect()
}

// Occurrences in `(after, through]`. The `after N` limit is not applied,
// matching how running balances have always been computed.
fn occurrences_between(transaction: &Transaction, after: NaiveDate, through: NaiveDate) -> usize {
    occurrences(transaction)
        .ignoring_count_limit()
        .skip_to_near(after)
        .skip_while(|d| *d <= after)
        .take_while(|d| *d <= through)
        .count()
}

/// Running balance at the end of `date`.
///
/// Adds to `start_balance` the signed value of every occurrence falling
/// strictly after the window's first day and on or before `date`. Expenses
/// subtract, income adds. Repeating transactions stop at an `on` end date
/// but are not capped by an `after N` count: a count-bounded series keeps
/// contributing to the balance past its last listed occurrence.
///
/// An empty window, or a `date` not after the window's first day, leaves
/// `start_balance` unchanged.
pub fn balance_as_of(
    transactions: &[Transaction],
    start_balance: Decimal,
    window: &[NaiveDate],
    date: NaiveDate,
) -> Decimal {
    let Some(&first) = window.first() else {
        return start_balance;
    };
    if date <= first {
        return start_balance;
    }
    transactions.iter().fold(start_balance, |balance, t| {
        let count = occurrences_between(t, first, date);
        if count == 0 {
            balance
        } else {
            balance + t.signed_value() * Decimal::from(count)
        }
    })
}

/// The occurrences visible on `date`, smallest value first.
///
/// Each returned transaction is a copy placed on `date`. Equal values keep
/// their input order.
pub fn filter_visible_on(transactions: &[Transaction], date: NaiveDate) -> Vec<Transaction> {
    let mut visible: Vec<Transaction> = transactions
        .iter()
        .filter(|t| occurs_on(t, date))
        .map(|t| t.occurrence_on(date))
        .collect();
    visible.sort_by(|a, b| a.value.cmp(&b.value));
    visible
}
