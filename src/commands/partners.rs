// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteSource;
use crate::source::RecordSource;
use crate::utils::{
    active_change, id_for_ship, maybe_print_json, parse_percentage, pretty_table, text_value,
    update_row,
};
use anyhow::{Result, anyhow};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM partners WHERE id=?1", params![id])?;
            if n == 0 {
                return Err(anyhow!("Partner {} not found", id));
            }
            println!("Removed partner {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn trimmed(sub: &clap::ArgMatches, key: &str) -> Option<String> {
    sub.get_one::<String>(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ship_id = id_for_ship(conn, sub.get_one::<String>("ship").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let share = parse_percentage(sub.get_one::<String>("share").unwrap())?;
    let email = trimmed(sub, "email");
    let phone = trimmed(sub, "phone");
    let active = !sub.get_flag("inactive");

    conn.execute(
        "INSERT INTO partners(ship_id, name, share_percentage, email, phone, is_active)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![ship_id, name, share.to_string(), email, phone, active],
    )?;
    println!("Added partner '{}' with {}% of ship {}", name, share, ship_id);
    warn_share_overflow(conn, ship_id)?;
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut changes = Vec::new();
    if let Some(raw) = sub.get_one::<String>("ship") {
        changes.push(("ship_id", SqlValue::Integer(id_for_ship(conn, raw)?)));
    }
    if let Some(name) = trimmed(sub, "name") {
        changes.push(("name", text_value(name)));
    }
    if let Some(raw) = sub.get_one::<String>("share") {
        changes.push(("share_percentage", text_value(parse_percentage(raw)?)));
    }
    if let Some(email) = trimmed(sub, "email") {
        changes.push(("email", text_value(email)));
    }
    if let Some(phone) = trimmed(sub, "phone") {
        changes.push(("phone", text_value(phone)));
    }
    if let Some(active) = active_change(sub) {
        changes.push(("is_active", SqlValue::Integer(active.into())));
    }
    update_row(conn, "partners", "Partner", id, changes)?;
    println!("Updated partner {}", id);
    let ship_id: i64 = conn.query_row(
        "SELECT ship_id FROM partners WHERE id=?1",
        params![id],
        |r| r.get(0),
    )?;
    warn_share_overflow(conn, ship_id)?;
    Ok(())
}

// Not enforced, only reported: the ledger accepts what the backend accepts.
fn warn_share_overflow(conn: &Connection, ship_id: i64) -> Result<()> {
    let total: Decimal = SqliteSource(conn)
        .fetch_partners()?
        .iter()
        .filter(|p| p.is_active && p.ship_id == ship_id)
        .map(|p| p.share_percentage)
        .sum();
    if total > Decimal::ONE_HUNDRED {
        tracing::warn!(ship_id, %total, "active partner shares exceed 100%");
        eprintln!(
            "warning: active partner shares on ship {} now total {:.2}%",
            ship_id, total
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ship_filter = match sub.get_one::<String>("ship") {
        Some(s) => Some(id_for_ship(conn, s)?),
        None => None,
    };
    let partners: Vec<_> = SqliteSource(conn)
        .fetch_partners()?
        .into_iter()
        .filter(|p| ship_filter.is_none_or(|id| p.ship_id == id))
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &partners)? {
        return Ok(());
    }
    let rows = partners
        .into_iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.ship_id.to_string(),
                p.name,
                format!("{:.2}%", p.share_percentage),
                p.email.unwrap_or_default(),
                p.phone.unwrap_or_default(),
                if p.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Ship", "Name", "Share", "Email", "Phone", "Active"],
            rows
        )
    );
    Ok(())
}
