// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{insert_category, load_categories};
use crate::models::Category;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let n = conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            if n == 0 {
                bail!("Category '{}' not found", name);
            }
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let position = match sub.get_one::<i64>("position") {
        Some(p) => *p,
        None => conn.query_row(
            "SELECT IFNULL(MAX(position), -1) + 1 FROM categories",
            [],
            |r| r.get(0),
        )?,
    };
    let category = Category {
        id: 0,
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        color: sub.get_one::<String>("color").unwrap().trim().to_string(),
        icon: sub.get_one::<String>("icon").unwrap().trim().to_string(),
        position,
    };
    category.validate()?;
    let id = insert_category(conn, &category)?;
    tracing::info!(id, name = %category.name, "category added");
    println!("Added category '{}'", category.name);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let categories = load_categories(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
        let rows: Vec<Vec<String>> = categories
            .into_iter()
            .map(|c| vec![c.position.to_string(), c.name, c.color, c.icon])
            .collect();
        println!("{}", pretty_table(&["#", "Category", "Color", "Icon"], rows));
    }
    Ok(())
}
