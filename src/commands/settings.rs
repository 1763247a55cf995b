// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::{Opening, WeekStart};
use crate::db::db_path;
use crate::utils::{
    fmt_money, get_opening, get_week_start, parse_date, parse_decimal, pretty_table, set_opening,
    set_week_start,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(conn)?,
        Some(("set-week-start", sub)) => {
            let day = sub.get_one::<String>("day").unwrap().parse::<WeekStart>()?;
            set_week_start(conn, day)?;
            println!("Weeks start on {}", day);
        }
        Some(("set-opening", sub)) => {
            let opening = Opening {
                date: parse_date(sub.get_one::<String>("date").unwrap())?,
                balance: parse_decimal(sub.get_one::<String>("balance").unwrap())?,
            };
            set_opening(conn, opening)?;
            println!(
                "Opening balance {} at end of {}",
                fmt_money(&opening.balance),
                opening.date
            );
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let opening = match get_opening(conn)? {
        Some(o) => format!("{} on {}", fmt_money(&o.balance), o.date),
        None => "0.00 before first transaction".to_string(),
    };
    let rows = vec![
        vec!["database".to_string(), db_path()?.display().to_string()],
        vec!["week_start".to_string(), get_week_start(conn)?.to_string()],
        vec!["opening".to_string(), opening],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
