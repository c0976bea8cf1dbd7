// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteSource;
use crate::source::RecordSource;
use crate::utils::{
    active_change, fmt_money, get_currency_label, id_for_ship, maybe_print_json, parse_date,
    parse_money, pretty_table, text_value, update_row,
};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM projects WHERE id=?1", params![id])?;
            if n == 0 {
                return Err(anyhow!("Project {} not found", id));
            }
            println!("Removed project {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let ship_id = match sub.get_one::<String>("ship") {
        Some(s) => Some(id_for_ship(conn, s)?),
        None => None,
    };
    // parse_money already rejects negative budgets.
    let budget = match sub.get_one::<String>("budget") {
        Some(raw) => Some(parse_money(raw)?),
        None => None,
    };
    let daily_rate = match sub.get_one::<String>("daily-rate") {
        Some(raw) => parse_money(raw)?,
        None => Decimal::ZERO,
    };
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = match sub.get_one::<String>("end") {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    if end.is_some_and(|e| e < start) {
        return Err(anyhow!("Project end date is before its start date"));
    }
    let status = sub.get_one::<String>("status").map(|s| s.trim().to_string());
    conn.execute(
        "INSERT INTO projects(ship_id, name, budget, daily_rate, start_date, end_date, status, is_active)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            ship_id,
            name,
            budget.map(|b| b.to_string()),
            daily_rate.to_string(),
            start.to_string(),
            end.map(|d| d.to_string()),
            status,
            !sub.get_flag("inactive")
        ],
    )?;
    println!("Added project {} '{}'", conn.last_insert_rowid(), name);
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let stored: Option<(Option<String>, Option<String>)> = conn
        .query_row(
            "SELECT start_date, end_date FROM projects WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let (stored_start, stored_end) = stored.with_context(|| format!("Project {} not found", id))?;
    let as_date = |s: Option<String>| s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

    let mut changes = Vec::new();
    if let Some(raw) = sub.get_one::<String>("name") {
        let name = raw.trim();
        if name.is_empty() {
            return Err(anyhow!("Project name must not be empty"));
        }
        changes.push(("name", text_value(name)));
    }
    if let Some(raw) = sub.get_one::<String>("ship") {
        changes.push(("ship_id", SqlValue::Integer(id_for_ship(conn, raw)?)));
    }
    if let Some(raw) = sub.get_one::<String>("budget") {
        changes.push(("budget", text_value(parse_money(raw)?)));
    }
    if let Some(raw) = sub.get_one::<String>("daily-rate") {
        changes.push(("daily_rate", text_value(parse_money(raw)?)));
    }
    let start = match sub.get_one::<String>("start") {
        Some(raw) => {
            let d = parse_date(raw)?;
            changes.push(("start_date", text_value(d)));
            Some(d)
        }
        None => as_date(stored_start),
    };
    let end = match sub.get_one::<String>("end") {
        Some(raw) => {
            let d = parse_date(raw)?;
            changes.push(("end_date", text_value(d)));
            Some(d)
        }
        None => as_date(stored_end),
    };
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            return Err(anyhow!("Project end date is before its start date"));
        }
    }
    if let Some(raw) = sub.get_one::<String>("status") {
        changes.push(("status", text_value(raw.trim())));
    }
    if let Some(active) = active_change(sub) {
        changes.push(("is_active", SqlValue::Integer(active.into())));
    }
    update_row(conn, "projects", "Project", id, changes)?;
    println!("Updated project {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let projects = SqliteSource(conn).fetch_projects()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &projects)? {
        return Ok(());
    }
    let label = get_currency_label(conn)?;
    let rows = projects
        .into_iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name,
                p.ship_id.map(|s| s.to_string()).unwrap_or_default(),
                p.budget.map(|b| fmt_money(&b, &label)).unwrap_or_default(),
                fmt_money(&p.daily_rate, &label),
                p.start_date.map(|d| d.to_string()).unwrap_or_default(),
                p.end_date.map(|d| d.to_string()).unwrap_or_default(),
                p.status.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Name", "Ship", "Budget", "Daily Rate", "Start", "End", "Status"],
            rows
        )
    );
    Ok(())
}
