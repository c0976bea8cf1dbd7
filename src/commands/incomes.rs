// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    id_for_project, id_for_ship, maybe_print_json, parse_date, parse_month, parse_positive_money,
    pretty_table, text_value, update_row,
};
use anyhow::{Result, anyhow};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM incomes WHERE id=?1", params![id])?;
            if n == 0 {
                return Err(anyhow!("Income {} not found", id));
            }
            println!("Removed income {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ship_id = id_for_ship(conn, sub.get_one::<String>("ship").unwrap())?;
    let amount = parse_positive_money(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let project_id = match sub.get_one::<String>("project") {
        Some(p) => Some(id_for_project(conn, p)?),
        None => None,
    };
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string());
    conn.execute(
        "INSERT INTO incomes(ship_id, project_id, amount, date, description)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            ship_id,
            project_id,
            amount.to_string(),
            date.to_string(),
            description
        ],
    )?;
    println!("Recorded income {} on {} for ship {}", amount, date, ship_id);
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut changes = Vec::new();
    if let Some(raw) = sub.get_one::<String>("ship") {
        changes.push(("ship_id", SqlValue::Integer(id_for_ship(conn, raw)?)));
    }
    if let Some(raw) = sub.get_one::<String>("amount") {
        changes.push(("amount", text_value(parse_positive_money(raw)?)));
    }
    if let Some(raw) = sub.get_one::<String>("date") {
        changes.push(("date", text_value(parse_date(raw)?)));
    }
    if let Some(raw) = sub.get_one::<String>("project") {
        changes.push(("project_id", SqlValue::Integer(id_for_project(conn, raw)?)));
    }
    if let Some(raw) = sub.get_one::<String>("description") {
        changes.push(("description", text_value(raw.trim())));
    }
    update_row(conn, "incomes", "Income", id, changes)?;
    println!("Updated income {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.ship.clone(),
                    r.project.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Ship", "Project", "Amount", "Description"],
                rows
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct IncomeRow {
    pub id: i64,
    pub date: String,
    pub ship: String,
    pub project: String,
    pub amount: String,
    pub description: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<IncomeRow>> {
    let mut sql = String::from(
        "SELECT i.id, i.date, s.name, p.name, i.amount, i.description FROM incomes i LEFT JOIN ships s ON i.ship_id=s.id LEFT JOIN projects p ON i.project_id=p.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        let m = parse_month(month)?;
        sql.push_str(" AND i.date BETWEEN ? AND ?");
        params_vec.push(m.first_day().to_string());
        params_vec.push(m.last_day().to_string());
    }
    if let Some(ship) = sub.get_one::<String>("ship") {
        sql.push_str(" AND i.ship_id=?");
        params_vec.push(id_for_ship(conn, ship)?.to_string());
    }
    sql.push_str(" ORDER BY i.date DESC, i.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let ship: Option<String> = r.get(2)?;
        let project: Option<String> = r.get(3)?;
        let date: Option<String> = r.get(1)?;
        let description: Option<String> = r.get(5)?;
        data.push(IncomeRow {
            id: r.get(0)?,
            date: date.unwrap_or_default(),
            ship: ship.unwrap_or_default(),
            project: project.unwrap_or_default(),
            amount: r.get(4)?,
            description: description.unwrap_or_default(),
        });
    }
    Ok(data)
}
