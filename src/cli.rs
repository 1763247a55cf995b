// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .required(true)
        .help("Month as YYYY-MM")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("color")
                        .long("color")
                        .default_value("#607d8b")
                        .help("Background color as #RRGGBB"),
                )
                .arg(Arg::new("icon").long("icon").default_value("category"))
                .arg(
                    Arg::new("position")
                        .long("position")
                        .value_parser(value_parser!(i64))
                        .help("Sort position; defaults to after the last category"),
                ),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and inspect transactions")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("date").long("date").required(true).help("First occurrence, YYYY-MM-DD"))
                .arg(Arg::new("label").long("label").required(true))
                .arg(Arg::new("value").long("value").required(true).help("Non-negative amount"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["expense", "income"])
                        .default_value("expense"),
                )
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("confirmed").long("confirmed").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("repeat")
                        .long("repeat")
                        .value_parser(["daily", "weekly", "monthly", "yearly"]),
                )
                .arg(
                    Arg::new("every")
                        .long("every")
                        .value_parser(value_parser!(u32))
                        .default_value("1")
                        .help("Repeat every N periods"),
                )
                .arg(
                    Arg::new("until")
                        .long("until")
                        .requires("repeat")
                        .conflicts_with("times")
                        .help("Last possible occurrence date"),
                )
                .arg(
                    Arg::new("times")
                        .long("times")
                        .requires("repeat")
                        .value_parser(value_parser!(u32))
                        .help("Number of occurrences"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .arg(Arg::new("month").long("month").help("Anchor month, YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(Command::new("rm").arg(id_arg()))
        .subcommand(
            Command::new("confirm")
                .arg(id_arg())
                .arg(Arg::new("undo").long("undo").action(ArgAction::SetTrue)),
        )
        .subcommand(json_flags(
            Command::new("occurrences")
                .about("List occurrence dates of one transaction")
                .arg(id_arg())
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("to").long("to").required(true)),
        ))
        .subcommand(json_flags(
            Command::new("day")
                .about("Transactions visible on a day")
                .arg(Arg::new("date").long("date").required(true)),
        ))
}

fn calendar_cmd() -> Command {
    Command::new("calendar")
        .about("Month grids and running balances")
        .subcommand(json_flags(
            Command::new("month")
                .arg(month_arg())
                .arg(
                    Arg::new("week_start")
                        .long("week-start")
                        .value_parser(["monday", "sunday"]),
                ),
        ))
        .subcommand(json_flags(
            Command::new("balance").arg(Arg::new("date").long("date").required(true)),
        ))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Statistics")
        .subcommand(json_flags(Command::new("summary").arg(month_arg())))
        .subcommand(json_flags(Command::new("by-category").arg(month_arg())))
        .subcommand(json_flags(
            Command::new("cashflow")
                .arg(Arg::new("to").long("to").required(true).help("Last month, YYYY-MM"))
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize))
                        .default_value("12"),
                ),
        ))
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Show or change settings")
        .subcommand(Command::new("show"))
        .subcommand(
            Command::new("set-week-start").arg(
                Arg::new("day")
                    .long("day")
                    .required(true)
                    .value_parser(["monday", "sunday"]),
            ),
        )
        .subcommand(
            Command::new("set-opening")
                .about("Set the known balance at the end of a day")
                .arg(Arg::new("date").long("date").required(true))
                .arg(
                    Arg::new("balance")
                        .long("balance")
                        .required(true)
                        .allow_hyphen_values(true),
                ),
        )
}

pub fn build_cli() -> Command {
    Command::new("cashcal")
        .version(clap::crate_version!())
        .about("Calendar-based personal finance with recurring transactions")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(calendar_cmd())
        .subcommand(report_cmd())
        .subcommand(config_cmd())
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Exchange transactions with a remote API")
                .subcommand(
                    Command::new("pull")
                        .arg(Arg::new("url").long("url").required(true))
                        .arg(Arg::new("token").long("token").help("Bearer token")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
