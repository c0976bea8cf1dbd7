// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteSource;
use crate::source::RecordSource;
use crate::utils::{
    active_change, fmt_money, get_currency_label, maybe_print_json, parse_date,
    parse_positive_money, pretty_table, text_value, update_row,
};
use anyhow::{Result, anyhow};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, *sub.get_one::<i64>("id").unwrap())?,
        _ => {}
    }
    Ok(())
}

/// Deletes the ship with its partners, incomes, expenses and stored profits.
/// Projects survive without a ship.
pub fn remove(conn: &Connection, id: i64) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let partners = tx.execute("DELETE FROM partners WHERE ship_id=?1", params![id])?;
    let incomes = tx.execute("DELETE FROM incomes WHERE ship_id=?1", params![id])?;
    let expenses = tx.execute("DELETE FROM expenses WHERE ship_id=?1", params![id])?;
    let profits = tx.execute("DELETE FROM monthly_profits WHERE ship_id=?1", params![id])?;
    tx.execute("UPDATE projects SET ship_id=NULL WHERE ship_id=?1", params![id])?;
    let n = tx.execute("DELETE FROM ships WHERE id=?1", params![id])?;
    if n == 0 {
        // Dropping `tx` rolls back.
        return Err(anyhow!("Ship {} not found", id));
    }
    tx.commit()?;
    tracing::info!(ship_id = id, partners, incomes, expenses, profits, "ship removed");
    println!(
        "Removed ship {} with {} partners, {} incomes, {} expenses, {} stored profits",
        id, partners, incomes, expenses, profits
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut changes = Vec::new();
    if let Some(raw) = sub.get_one::<String>("name") {
        let name = raw.trim();
        if name.is_empty() {
            return Err(anyhow!("Ship name must not be empty"));
        }
        changes.push(("name", text_value(name)));
    }
    if let Some(raw) = sub.get_one::<String>("cost") {
        changes.push(("purchase_cost", text_value(parse_positive_money(raw)?)));
    }
    if let Some(raw) = sub.get_one::<String>("purchase-date") {
        changes.push(("purchase_date", text_value(parse_date(raw)?)));
    }
    if let Some(active) = active_change(sub) {
        changes.push(("is_active", SqlValue::Integer(active.into())));
    }
    update_row(conn, "ships", "Ship", id, changes)?;
    println!("Updated ship {}", id);
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        return Err(anyhow!("Ship name must not be empty"));
    }
    let cost = match sub.get_one::<String>("cost") {
        Some(raw) => Some(parse_positive_money(raw)?),
        None => None,
    };
    let purchase_date = match sub.get_one::<String>("purchase-date") {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    let active = !sub.get_flag("inactive");
    conn.execute(
        "INSERT INTO ships(name, purchase_cost, purchase_date, is_active) VALUES (?1,?2,?3,?4)",
        params![
            name,
            cost.map(|c| c.to_string()),
            purchase_date.map(|d| d.to_string()),
            active
        ],
    )?;
    let id = conn.last_insert_rowid();
    match cost {
        Some(c) => println!("Added ship {} '{}' (cost {})", id, name, c),
        None => println!("Added ship {} '{}' (no purchase cost)", id, name),
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ships = SqliteSource(conn).fetch_ships()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ships)? {
        return Ok(());
    }
    let label = get_currency_label(conn)?;
    let rows = ships
        .into_iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.name,
                s.purchase_cost
                    .map(|c| fmt_money(&c, &label))
                    .unwrap_or_else(|| "-".into()),
                s.purchase_date.map(|d| d.to_string()).unwrap_or_default(),
                if s.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Purchase Cost", "Purchased", "Active"], rows)
    );
    Ok(())
}
