// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
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

fn remote_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("remote")
            .long("remote")
            .action(ArgAction::SetTrue)
            .help("Read records from the REST backend instead of the local ledger"),
    )
}

fn req(name: &'static str) -> Arg {
    Arg::new(name).long(name).required(true)
}

fn opt(name: &'static str) -> Arg {
    Arg::new(name).long(name)
}

fn month_arg() -> Arg {
    req("month").help("Month as YYYY-MM")
}

fn list_filters(cmd: Command) -> Command {
    json_args(
        cmd.arg(opt("month").help("Only records in this month (YYYY-MM)"))
            .arg(opt("ship").help("Ship id or name"))
            .arg(opt("limit").value_parser(value_parser!(usize))),
    )
}

fn rm_cmd() -> Command {
    Command::new("rm").arg(req("id").value_parser(value_parser!(i64)))
}

/// `edit` takes the record id plus optional replacement fields.
fn edit_cmd() -> Command {
    Command::new("edit")
        .about("Change fields of an existing record")
        .arg(req("id").value_parser(value_parser!(i64)))
}

fn status_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("active")
            .long("active")
            .action(ArgAction::SetTrue)
            .conflicts_with("inactive")
            .help("Mark as active"),
    )
    .arg(inactive_arg())
}

fn inactive_arg() -> Arg {
    Arg::new("inactive")
        .long("inactive")
        .action(ArgAction::SetTrue)
        .help("Record as inactive")
}

pub fn build_cli() -> Command {
    Command::new("shipledger")
        .version(crate_version!())
        .about("Ship income, expense, profit and partner-share ledger")
        .subcommand(Command::new("init").about("Create the ledger database"))
        .subcommand(
            Command::new("ship")
                .about("Manage ships")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(opt("cost").help("Purchase cost"))
                        .arg(opt("purchase-date").help("YYYY-MM-DD"))
                        .arg(inactive_arg()),
                )
                .subcommand(status_args(
                    edit_cmd()
                        .arg(opt("name"))
                        .arg(opt("cost").help("Purchase cost"))
                        .arg(opt("purchase-date").help("YYYY-MM-DD")),
                ))
                .subcommand(json_args(Command::new("list")))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("partner")
                .about("Manage partners")
                .subcommand(
                    Command::new("add")
                        .arg(req("ship").help("Ship id or name"))
                        .arg(req("name"))
                        .arg(req("share").help("Share percentage, 0-100"))
                        .arg(opt("email"))
                        .arg(opt("phone"))
                        .arg(inactive_arg()),
                )
                .subcommand(status_args(
                    edit_cmd()
                        .arg(opt("ship").help("Ship id or name"))
                        .arg(opt("name"))
                        .arg(opt("share").help("Share percentage, 0-100"))
                        .arg(opt("email"))
                        .arg(opt("phone")),
                ))
                .subcommand(json_args(
                    Command::new("list").arg(opt("ship").help("Ship id or name")),
                ))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("project")
                .about("Manage projects")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(opt("ship").help("Ship id or name"))
                        .arg(opt("budget"))
                        .arg(opt("daily-rate"))
                        .arg(req("start").help("Start date YYYY-MM-DD"))
                        .arg(opt("end").help("End date YYYY-MM-DD"))
                        .arg(opt("status"))
                        .arg(inactive_arg()),
                )
                .subcommand(status_args(
                    edit_cmd()
                        .arg(opt("name"))
                        .arg(opt("ship").help("Ship id or name"))
                        .arg(opt("budget"))
                        .arg(opt("daily-rate"))
                        .arg(opt("start").help("Start date YYYY-MM-DD"))
                        .arg(opt("end").help("End date YYYY-MM-DD"))
                        .arg(opt("status")),
                ))
                .subcommand(json_args(Command::new("list")))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("income")
                .about("Record daily income")
                .subcommand(
                    Command::new("add")
                        .arg(req("ship").help("Ship id or name"))
                        .arg(req("amount"))
                        .arg(req("date").help("YYYY-MM-DD"))
                        .arg(opt("project").help("Project id or name"))
                        .arg(opt("description")),
                )
                .subcommand(
                    edit_cmd()
                        .arg(opt("ship").help("Ship id or name"))
                        .arg(opt("amount"))
                        .arg(opt("date").help("YYYY-MM-DD"))
                        .arg(opt("project").help("Project id or name"))
                        .arg(opt("description")),
                )
                .subcommand(list_filters(Command::new("list")))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("expense")
                .about("Record expenses")
                .subcommand(
                    Command::new("add")
                        .arg(req("ship").help("Ship id or name"))
                        .arg(req("amount"))
                        .arg(req("date").help("YYYY-MM-DD"))
                        .arg(opt("category"))
                        .arg(opt("description")),
                )
                .subcommand(
                    edit_cmd()
                        .arg(opt("ship").help("Ship id or name"))
                        .arg(opt("amount"))
                        .arg(opt("date").help("YYYY-MM-DD"))
                        .arg(opt("category"))
                        .arg(opt("description")),
                )
                .subcommand(list_filters(Command::new("list")))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("profit")
                .about("Monthly profit per ship")
                .subcommand(json_args(remote_arg(
                    Command::new("calculate").arg(month_arg()),
                )))
                .subcommand(json_args(remote_arg(
                    Command::new("list").arg(opt("ship").help("Ship id or name")),
                ))),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboard and partner reports")
                .subcommand(json_args(remote_arg(
                    Command::new("dashboard").arg(opt("date").help("YYYY-MM-DD, default today")),
                )))
                .subcommand(json_args(remote_arg(
                    Command::new("daily")
                        .arg(month_arg())
                        .arg(opt("ship").help("Ship id or name")),
                )))
                .subcommand(json_args(remote_arg(
                    Command::new("partners").arg(month_arg()),
                )))
                .subcommand(json_args(remote_arg(Command::new("slips").arg(month_arg())))),
        )
        .subcommand(
            Command::new("export")
                .about("Write reports to CSV or JSON files")
                .subcommand(
                    remote_arg(Command::new("slips"))
                        .arg(month_arg())
                        .arg(req("format").help("csv|json"))
                        .arg(req("out")),
                )
                .subcommand(
                    remote_arg(Command::new("profits"))
                        .arg(req("format").help("csv|json"))
                        .arg(req("out")),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Load records from a JSON snapshot file")
                .subcommand(Command::new("snapshot").arg(req("path"))),
        )
        .subcommand(
            Command::new("sync")
                .about("Exchange records with the REST backend")
                .subcommand(Command::new("pull").about("Replace the ledger with backend records"))
                .subcommand(
                    Command::new("push")
                        .about("Ask the backend to calculate profits for every active ship")
                        .arg(month_arg()),
                ),
        )
        .subcommand(json_args(remote_arg(
            Command::new("doctor").about("Check records for integrity problems"),
        )))
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set-currency").arg(req("label"))),
        )
}
