// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{load_categories, load_transactions};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "ID", "Detail"], rows));
    }
    Ok(())
}

/// One `[issue, id, detail]` row per problem found in stored transactions.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let known: HashSet<i64> = load_categories(conn)?.into_iter().map(|c| c.id).collect();
    let mut rows = Vec::new();
    for t in load_transactions(conn)? {
        let id = t.id.map(|i| i.to_string()).unwrap_or_default();

        // 1) Records that would be rejected on entry
        if let Err(err) = t.validate() {
            rows.push(vec!["invalid_record".into(), id.clone(), err.to_string()]);
        }

        // 2) Category rows that no longer exist
        if let Some(cat) = t.category_id.filter(|c| !known.contains(c)) {
            rows.push(vec![
                "dangling_category".into(),
                id.clone(),
                format!("category id {} not found", cat),
            ]);
        }

        // 3) Series whose later occurrences move to the end of the month
        if let Some(rule) = t.repeat.filter(|r| r.may_clamp(t.date)) {
            rows.push(vec![
                "month_end_clamp".into(),
                id,
                format!("{} from {}", rule, t.date),
            ]);
        }
    }
    Ok(rows)
}
