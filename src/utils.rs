// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::YearMonth;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use rust_decimal::Decimal;

/// Matches the backend's money columns: at most 8 integer digits.
static MONEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,8}(\.\d+)?$").unwrap());

pub const DEFAULT_CURRENCY_LABEL: &str = "Tk";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<YearMonth> {
    s.trim()
        .parse::<YearMonth>()
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses a user-entered amount the way the backend stores it: commas
/// stripped, at most 8 integer digits, rounded to 2 decimal places.
pub fn parse_money(s: &str) -> Result<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if !MONEY.is_match(&cleaned) {
        return Err(anyhow!(
            "Invalid amount '{}': expected a non-negative number with at most 8 digits before the decimal (e.g. 99999999.99)",
            s
        ));
    }
    Ok(parse_decimal(&cleaned)?.round_dp(2))
}

pub fn parse_positive_money(s: &str) -> Result<Decimal> {
    let d = parse_money(s)?;
    if d <= Decimal::ZERO {
        return Err(anyhow!("Amount '{}' must be a positive number", s));
    }
    Ok(d)
}

pub fn parse_percentage(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO || d > Decimal::ONE_HUNDRED {
        return Err(anyhow!("Share percentage '{}' must be between 0 and 100", s));
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal, label: &str) -> String {
    format!("{} {:.2}", label, d.round_dp(2))
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Resolves a ship given either its numeric id or its exact name.
pub fn id_for_ship(conn: &Connection, key: &str) -> Result<i64> {
    let key = key.trim();
    let found: Option<i64> = if let Ok(id) = key.parse::<i64>() {
        conn.query_row("SELECT id FROM ships WHERE id=?1", params![id], |r| r.get(0))
            .optional()?
    } else {
        conn.query_row("SELECT id FROM ships WHERE name=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?
    };
    found.with_context(|| format!("Ship '{}' not found", key))
}

pub fn id_for_project(conn: &Connection, key: &str) -> Result<i64> {
    let key = key.trim();
    let found: Option<i64> = if let Ok(id) = key.parse::<i64>() {
        conn.query_row("SELECT id FROM projects WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?
    } else {
        conn.query_row("SELECT id FROM projects WHERE name=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?
    };
    found.with_context(|| format!("Project '{}' not found", key))
}

/// `--active` / `--inactive` on edit commands; `None` leaves the flag alone.
pub fn active_change(sub: &clap::ArgMatches) -> Option<bool> {
    if sub.get_flag("active") {
        Some(true)
    } else if sub.get_flag("inactive") {
        Some(false)
    } else {
        None
    }
}

/// Writes `changes` to row `id` of `table`. Errors when no field was given
/// or when the row does not exist.
pub fn update_row(
    conn: &Connection,
    table: &str,
    what: &str,
    id: i64,
    changes: Vec<(&str, SqlValue)>,
) -> Result<()> {
    if changes.is_empty() {
        return Err(anyhow!("Nothing to change for {} {}", what, id));
    }
    let sets: Vec<String> = changes.iter().map(|(col, _)| format!("{}=?", col)).collect();
    let sql = format!("UPDATE {} SET {} WHERE id=?", table, sets.join(", "));
    let mut values: Vec<SqlValue> = changes.into_iter().map(|(_, v)| v).collect();
    values.push(SqlValue::Integer(id));
    let n = conn.execute(&sql, params_from_iter(values))?;
    if n == 0 {
        return Err(anyhow!("{} {} not found", what, id));
    }
    Ok(())
}

pub fn text_value(s: impl ToString) -> SqlValue {
    SqlValue::Text(s.to_string())
}

pub fn get_currency_label(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='currency_label'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY_LABEL.to_string()))
}

pub fn set_currency_label(conn: &Connection, label: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency_label', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![label],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
