// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            _ => Err(ValidationError::UnknownVariant {
                kind: "transaction type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(ValidationError::UnknownVariant {
                kind: "repeat frequency",
                value: s.to_string(),
            }),
        }
    }
}

/// Termination mode of a series as it appears in flat records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatEndType {
    On,
    After,
}

impl RepeatEndType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatEndType::On => "on",
            RepeatEndType::After => "after",
        }
    }
}

impl FromStr for RepeatEndType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(RepeatEndType::On),
            "after" => Ok(RepeatEndType::After),
            _ => Err(ValidationError::UnknownVariant {
                kind: "repeat end type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatEnd {
    /// No occurrence after this date.
    On(NaiveDate),
    /// At most this many occurrences, counted from the first one.
    After(u32),
}

/// Repeat rule of a transaction. The transaction date is the first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub every: u32,
    pub end: Option<RepeatEnd>,
}

impl Recurrence {
    pub fn new(frequency: Frequency, every: u32) -> Self {
        Self {
            frequency,
            every,
            end: None,
        }
    }

    pub fn until(mut self, date: NaiveDate) -> Self {
        self.end = Some(RepeatEnd::On(date));
        self
    }

    pub fn times(mut self, count: u32) -> Self {
        self.end = Some(RepeatEnd::After(count));
        self
    }

    /// Interval in periods; zero is read as one.
    pub fn interval(&self) -> u32 {
        self.every.max(1)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self.end {
            Some(RepeatEnd::On(d)) => Some(d),
            _ => None,
        }
    }

    pub fn end_occurrences(&self) -> Option<u32> {
        match self.end {
            Some(RepeatEnd::After(n)) => Some(n),
            _ => None,
        }
    }

    pub fn end_type(&self) -> Option<RepeatEndType> {
        self.end.map(|e| match e {
            RepeatEnd::On(_) => RepeatEndType::On,
            RepeatEnd::After(_) => RepeatEndType::After,
        })
    }

    /// Whether some occurrences of a series anchored on `anchor` fall on a
    /// month's last day instead of the anchor's day.
    pub fn may_clamp(&self, anchor: NaiveDate) -> bool {
        match self.frequency {
            Frequency::Monthly => anchor.day() > 28,
            Frequency::Yearly => anchor.month() == 2 && anchor.day() == 29,
            Frequency::Daily | Frequency::Weekly => false,
        }
    }

    /// Builds a rule from the loosely typed columns of a flat record.
    ///
    /// Missing or non-positive intervals become 1. An end type without its
    /// date or count means the series never ends.
    pub fn from_parts(
        repeat: Option<Frequency>,
        every: Option<i64>,
        end_type: Option<RepeatEndType>,
        end_date: Option<NaiveDate>,
        end_occurrences: Option<i64>,
    ) -> Option<Recurrence> {
        let frequency = repeat?;
        let every = every
            .filter(|e| *e >= 1)
            .map(|e| u32::try_from(e).unwrap_or(u32::MAX))
            .unwrap_or(1);
        let end = match end_type {
            Some(RepeatEndType::On) => end_date.map(RepeatEnd::On),
            Some(RepeatEndType::After) => end_occurrences
                .map(|n| RepeatEnd::After(u32::try_from(n.max(0)).unwrap_or(u32::MAX))),
            None => None,
        };
        Some(Recurrence {
            frequency,
            every,
            end,
        })
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.frequency {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        };
        match self.interval() {
            1 => write!(f, "{}", self.frequency)?,
            n => write!(f, "every {} {}s", n, unit)?,
        }
        match self.end {
            Some(RepeatEnd::On(d)) => write!(f, " until {}", d),
            Some(RepeatEnd::After(n)) => write!(f, ", {} times", n),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<i64>,
    pub category_id: Option<i64>,
    pub label: String,
    /// Magnitude; the sign comes from `type`.
    pub value: Decimal,
    pub r#type: TransactionType,
    /// Anchor date, i.e. the first occurrence of a repeating transaction.
    pub date: NaiveDate,
    pub confirmed: bool,
    pub repeat: Option<Recurrence>,
}

impl Transaction {
    pub fn new(label: &str, value: Decimal, r#type: TransactionType, date: NaiveDate) -> Self {
        Self {
            id: None,
            category_id: None,
            label: label.to_string(),
            value,
            r#type,
            date,
            confirmed: false,
            repeat: None,
        }
    }

    pub fn with_repeat(mut self, repeat: Recurrence) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn signed_value(&self) -> Decimal {
        match self.r#type {
            TransactionType::Expense => -self.value,
            TransactionType::Income => self.value,
        }
    }

    /// Copy of this transaction placed on `date`.
    pub fn occurrence_on(&self, date: NaiveDate) -> Transaction {
        Transaction {
            date,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::EmptyLabel);
        }
        if self.value.is_sign_negative() && !self.value.is_zero() {
            return Err(ValidationError::NegativeValue(self.value));
        }
        if let Some(rule) = &self.repeat {
            if rule.every == 0 {
                return Err(ValidationError::ZeroInterval);
            }
            match rule.end {
                Some(RepeatEnd::On(end)) if end < self.date => {
                    return Err(ValidationError::EndBeforeAnchor {
                        anchor: self.date,
                        end,
                    });
                }
                Some(RepeatEnd::After(0)) => return Err(ValidationError::ZeroOccurrences),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Flat camelCase shape exchanged with the remote API and JSON exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub label: String,
    pub value: Decimal,
    pub r#type: TransactionType,
    #[serde(deserialize_with = "day::deserialize")]
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub repeat: Option<Frequency>,
    #[serde(default)]
    pub repeat_every: Option<i64>,
    #[serde(default)]
    pub repeat_end_type: Option<RepeatEndType>,
    #[serde(default, deserialize_with = "day::deserialize_opt")]
    pub repeat_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub repeat_end_occurrences: Option<i64>,
}

impl From<TransactionRecord> for Transaction {
    fn from(r: TransactionRecord) -> Self {
        let repeat = Recurrence::from_parts(
            r.repeat,
            r.repeat_every,
            r.repeat_end_type,
            r.repeat_end_date,
            r.repeat_end_occurrences,
        );
        Transaction {
            id: r.id,
            category_id: r.category_id,
            label: r.label,
            value: r.value,
            r#type: r.r#type,
            date: r.transaction_date,
            confirmed: r.confirmed,
            repeat,
        }
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(t: &Transaction) -> Self {
        let rule = t.repeat.as_ref();
        TransactionRecord {
            id: t.id,
            category_id: t.category_id,
            label: t.label.clone(),
            value: t.value,
            r#type: t.r#type,
            transaction_date: t.date,
            confirmed: t.confirmed,
            repeat: rule.map(|r| r.frequency),
            repeat_every: rule.map(|r| i64::from(r.interval())),
            repeat_end_type: rule.and_then(|r| r.end_type()),
            repeat_end_date: rule.and_then(|r| r.end_date()),
            repeat_end_occurrences: rule.and_then(|r| r.end_occurrences()).map(i64::from),
        }
    }
}

// Remote payloads may carry full timestamps; only the calendar day matters.
mod day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::Error};

    fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        let raw = raw.trim();
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub fn deserialize_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        raw.filter(|s| !s.trim().is_empty())
            .map(|s| parse(&s))
            .transpose()
            .map_err(D::Error::custom)
    }
}

pub const UNCATEGORIZED_ID: i64 = 0;

static COLOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub position: i64,
}

impl Category {
    pub fn uncategorized() -> Self {
        Category {
            id: UNCATEGORIZED_ID,
            name: "Uncategorized".to_string(),
            color: "#9e9e9e".to_string(),
            icon: "category".to_string(),
            position: i64::MAX,
        }
    }

    /// The category a transaction is shown under; unknown ids fall back to
    /// `Uncategorized`.
    pub fn resolve(categories: &[Category], id: Option<i64>) -> Category {
        id.and_then(|id| categories.iter().find(|c| c.id == id))
            .cloned()
            .unwrap_or_else(Category::uncategorized)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        if !COLOR_RE.is_match(&self.color) {
            return Err(ValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}
