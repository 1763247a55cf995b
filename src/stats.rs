// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::{first_of_month, month_end};
use crate::models::{Category, Transaction, TransactionType};
use crate::recurrence::occurrences_in_range;
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub r#type: TransactionType,
    pub total: Decimal,
    pub occurrences: usize,
    /// Percent of all income or all expenses in the period, 2 dp.
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFlow {
    pub month: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Totals over every occurrence dated within `[from, to]`.
///
/// Occurrences come from [`occurrences_in_range`], so `after N` limits are
/// respected here even though running balances ignore them.
pub fn summarize(
    transactions: &[Transaction],
    categories: &[Category],
    from: NaiveDate,
    to: NaiveDate,
) -> PeriodSummary {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut totals: BTreeMap<(TransactionType, i64), (Decimal, usize)> = BTreeMap::new();

    for t in transactions {
        let count = occurrences_in_range(t, from, to).len();
        if count == 0 {
            continue;
        }
        let amount = t.value * Decimal::from(count);
        match t.r#type {
            TransactionType::Income => income += amount,
            TransactionType::Expense => expense += amount,
        }
        let category_id = Category::resolve(categories, t.category_id).id;
        let entry = totals
            .entry((t.r#type, category_id))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += amount;
        entry.1 += count;
    }

    let mut by_category: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|((kind, category_id), (total, occurrences))| {
            let kind_total = match kind {
                TransactionType::Income => income,
                TransactionType::Expense => expense,
            };
            let share = if kind_total.is_zero() {
                Decimal::ZERO
            } else {
                (total * Decimal::ONE_HUNDRED / kind_total).round_dp(2)
            };
            CategoryTotal {
                category: Category::resolve(categories, Some(category_id)),
                r#type: kind,
                total,
                occurrences,
                share,
            }
        })
        .collect();
    by_category.sort_by(|a, b| {
        a.r#type
            .cmp(&b.r#type)
            .then(b.total.cmp(&a.total))
            .then_with(|| a.category.name.cmp(&b.category.name))
    });

    PeriodSummary {
        from,
        to,
        income,
        expense,
        net: income - expense,
        by_category,
    }
}

pub fn month_summary(
    transactions: &[Transaction],
    categories: &[Category],
    month: NaiveDate,
) -> PeriodSummary {
    summarize(
        transactions,
        categories,
        first_of_month(month),
        month_end(month),
    )
}

/// Income and expense for the `months` months ending with `last_month`,
/// newest first.
pub fn cashflow(transactions: &[Transaction], last_month: NaiveDate, months: usize) -> Vec<MonthFlow> {
    let last = first_of_month(last_month);
    (0..months)
        .map_while(|i| {
            let back = u32::try_from(i).ok()?;
            last.checked_sub_months(Months::new(back))
        })
        .map(|start| {
            let s = summarize(transactions, &[], start, month_end(start));
            MonthFlow {
                month: start,
                income: s.income,
                expense: s.expense,
                net: s.net,
            }
        })
        .collect()
}
