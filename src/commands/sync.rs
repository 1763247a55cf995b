// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::importer::store_records;
use crate::models::TransactionRecord;
use crate::utils::http_client;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("pull", sub)) = m.subcommand() {
        let url = sub.get_one::<String>("url").unwrap().trim();
        let token = sub.get_one::<String>("token").map(|s| s.trim());
        let records = fetch_records(url, token)?;
        let n = store_records(conn, records)?;
        println!("Pulled {} transactions from {}", n, url);
    }
    Ok(())
}

/// GETs a JSON array of transaction records. One attempt, no retries.
pub fn fetch_records(url: &str, token: Option<&str>) -> Result<Vec<TransactionRecord>> {
    let client = http_client()?;
    let mut req = client.get(url);
    if let Some(t) = token {
        req = req.bearer_auth(t);
    }
    let resp = req
        .send()
        .with_context(|| format!("Request {}", url))?
        .error_for_status()?;
    let records: Vec<TransactionRecord> = resp
        .json()
        .with_context(|| format!("Decode transactions from {}", url))?;
    tracing::info!(count = records.len(), url, "fetched remote transactions");
    Ok(records)
}
