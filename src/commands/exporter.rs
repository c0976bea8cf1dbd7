// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::load_snapshot;
use crate::config::AppConfig;
use crate::engine::{partner_slips, partner_statements, profit_history};
use crate::utils::parse_month;
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    match m.subcommand() {
        Some(("slips", sub)) => export_slips(conn, sub, cfg),
        Some(("profits", sub)) => export_profits(conn, sub, cfg),
        _ => Ok(()),
    }
}

fn format_of(sub: &clap::ArgMatches) -> Result<String> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    match fmt.as_str() {
        "csv" | "json" => Ok(fmt),
        _ => Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
}

fn export_slips(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let fmt = format_of(sub)?;
    let out = sub.get_one::<String>("out").unwrap().trim();
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let slips = partner_slips(&partner_statements(&snapshot, month));

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "month",
                "ship",
                "purchase_cost",
                "partner",
                "share_amount",
                "net_profit",
                "benefit_per_lakh",
                "payable",
            ])?;
            for s in &slips {
                wtr.write_record([
                    s.month.to_string(),
                    s.ship_name.clone(),
                    format!("{:.2}", s.purchase_cost),
                    s.partner_name.clone(),
                    format!("{:.2}", s.share_amount),
                    format!("{:.2}", s.net_profit),
                    format!("{:.2}", s.benefit_per_unit),
                    format!("{:.2}", s.payable),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = slips
                .iter()
                .map(|s| {
                    json!({
                        "month": s.month.to_string(),
                        "ship": s.ship_name,
                        "purchase_cost": format!("{:.2}", s.purchase_cost),
                        "partner": s.partner_name,
                        "share_amount": format!("{:.2}", s.share_amount),
                        "net_profit": format!("{:.2}", s.net_profit),
                        "benefit_per_lakh": format!("{:.2}", s.benefit_per_unit),
                        "payable": format!("{:.2}", s.payable),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    println!("Exported {} partner slips to {}", slips.len(), out);
    Ok(())
}

fn export_profits(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let fmt = format_of(sub)?;
    let out = sub.get_one::<String>("out").unwrap().trim();
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let history = profit_history(&snapshot.profits);
    let name_of = |id: i64| {
        snapshot
            .ship(id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    };

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "ship_id",
                "ship",
                "month",
                "total_income",
                "total_expenses",
                "net_profit",
                "trend_delta",
                "trend_percent",
            ])?;
            for h in &history {
                let p = &h.profit;
                wtr.write_record([
                    p.ship_id.to_string(),
                    name_of(p.ship_id),
                    p.month.to_string(),
                    format!("{:.2}", p.total_income),
                    format!("{:.2}", p.total_expenses),
                    format!("{:.2}", p.net_profit),
                    h.trend.map(|t| format!("{:.2}", t.delta)).unwrap_or_default(),
                    h.trend.map(|t| format!("{:.1}", t.percent)).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = history
                .iter()
                .map(|h| {
                    let p = &h.profit;
                    json!({
                        "ship_id": p.ship_id,
                        "ship": name_of(p.ship_id),
                        "month": p.month.to_string(),
                        "total_income": format!("{:.2}", p.total_income),
                        "total_expenses": format!("{:.2}", p.total_expenses),
                        "net_profit": format!("{:.2}", p.net_profit),
                        "trend_delta": h.trend.map(|t| format!("{:.2}", t.delta)),
                        "trend_percent": h.trend.map(|t| format!("{:.1}", t.percent)),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    println!("Exported {} monthly profits to {}", history.len(), out);
    Ok(())
}
