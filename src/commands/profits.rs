// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{load_snapshot, ship_filter};
use crate::config::AppConfig;
use crate::db::store_profit;
use crate::engine::{BatchReport, ProfitHistoryRow, calculate_profit_for_all_ships, profit_history};
use crate::models::{Snapshot, YearMonth};
use crate::utils::{fmt_money, fmt_percent, get_currency_label, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    match m.subcommand() {
        Some(("calculate", sub)) => calculate(conn, sub, cfg)?,
        Some(("list", sub)) => list(conn, sub, cfg)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct OutcomeRow {
    pub ship_id: i64,
    pub ship_name: String,
    pub ok: bool,
    pub total_income: Option<Decimal>,
    pub total_expenses: Option<Decimal>,
    pub net_profit: Option<Decimal>,
    pub error: Option<String>,
}

/// Runs the batch for `month` and stores every successful ship's profit in the ledger.
pub fn calculate_and_store(
    conn: &Connection,
    snapshot: &Snapshot,
    month: YearMonth,
) -> Result<BatchReport> {
    let report =
        calculate_profit_for_all_ships(&snapshot.ships, &snapshot.incomes, &snapshot.expenses, month);
    for p in report.succeeded() {
        store_profit(conn, p)?;
    }
    tracing::info!(
        %month,
        stored = report.succeeded().count(),
        failed = report.failed().count(),
        "monthly profits calculated"
    );
    Ok(report)
}

pub fn outcome_rows(snapshot: &Snapshot, report: &BatchReport) -> Vec<OutcomeRow> {
    report
        .results
        .iter()
        .map(|(id, r)| {
            let ship_name = snapshot.ship(*id).map(|s| s.name.clone()).unwrap_or_default();
            match r {
                Ok(p) => OutcomeRow {
                    ship_id: *id,
                    ship_name,
                    ok: true,
                    total_income: Some(p.total_income),
                    total_expenses: Some(p.total_expenses),
                    net_profit: Some(p.net_profit),
                    error: None,
                },
                Err(e) => OutcomeRow {
                    ship_id: *id,
                    ship_name,
                    ok: false,
                    total_income: None,
                    total_expenses: None,
                    net_profit: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect()
}

fn calculate(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let report = calculate_and_store(conn, &snapshot, month)?;
    let rows = outcome_rows(&snapshot, &report);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let label = get_currency_label(conn)?;
    let money = |d: Option<Decimal>| d.map(|v| fmt_money(&v, &label)).unwrap_or_else(|| "-".into());
    let failed = rows.iter().filter(|r| !r.ok).count();
    let table_rows = rows
        .into_iter()
        .map(|r| {
            vec![
                r.ship_name,
                if r.ok { "ok".into() } else { "failed".into() },
                money(r.total_income),
                money(r.total_expenses),
                money(r.net_profit),
                r.error.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Ship", "Status", "Income", "Expenses", "Net Profit", "Reason"],
            table_rows
        )
    );
    if failed == 0 {
        println!("Profit calculated for all ships for {}", month);
    } else {
        println!("Profit calculated for {} with {} ship(s) failing", month, failed);
    }
    Ok(())
}

/// Stored profits with trend, narrowed to `--ship` when given.
pub fn history_rows(snapshot: &Snapshot, sub: &clap::ArgMatches) -> Result<Vec<ProfitHistoryRow>> {
    let ship = ship_filter(snapshot, sub)?;
    Ok(profit_history(&snapshot.profits)
        .into_iter()
        .filter(|h| ship.is_none_or(|id| h.profit.ship_id == id))
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let history = history_rows(&snapshot, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &history)? {
        return Ok(());
    }
    if history.is_empty() {
        println!("No profit data available. Run `profit calculate --month YYYY-MM` first.");
        return Ok(());
    }
    let label = get_currency_label(conn)?;
    let rows = history
        .into_iter()
        .map(|h| {
            let name = snapshot
                .ship(h.profit.ship_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| h.profit.ship_id.to_string());
            let trend = match h.trend {
                Some(t) if t.delta >= Decimal::ZERO => {
                    format!("↑ {:.0} ({})", t.delta, fmt_percent(&t.percent))
                }
                Some(t) => format!("↓ {:.0} ({})", t.delta.abs(), fmt_percent(&t.percent)),
                None => "-".into(),
            };
            vec![
                name,
                h.profit.month.to_string(),
                fmt_money(&h.profit.total_income, &label),
                fmt_money(&h.profit.total_expenses, &label),
                fmt_money(&h.profit.net_profit, &label),
                trend,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Ship", "Month", "Income", "Expenses", "Net Profit", "Trend"],
            rows
        )
    );
    Ok(())
}
