// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Problems with a record entered by the user or read from an import.
///
/// The recurrence engine never produces these: it treats malformed records
/// as contributing nothing. They are raised only where a record is about to
/// be stored.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("label cannot be empty")]
    EmptyLabel,

    #[error("value must not be negative, got {0}")]
    NegativeValue(Decimal),

    #[error("repeat interval must be at least 1")]
    ZeroInterval,

    /// The series would end before its first occurrence.
    #[error("repeat end date {end} is before the first occurrence on {anchor}")]
    EndBeforeAnchor { anchor: NaiveDate, end: NaiveDate },

    #[error("occurrence count must be at least 1")]
    ZeroOccurrences,

    #[error("category name cannot be empty")]
    EmptyCategoryName,

    #[error("invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
