// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{load_snapshot, ship_filter};
use crate::config::AppConfig;
use crate::engine::{
    BENEFIT_UNIT, Trend, daily_income_series, dashboard_summary, partner_slips, partner_statements,
};
use crate::utils::{
    fmt_money, fmt_percent, get_currency_label, maybe_print_json, parse_date, parse_month,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(conn, sub, cfg)?,
        Some(("daily", sub)) => daily(conn, sub, cfg)?,
        Some(("partners", sub)) => partners(conn, sub, cfg)?,
        Some(("slips", sub)) => slips(conn, sub, cfg)?,
        _ => {}
    }
    Ok(())
}

fn arrow(t: &Trend) -> String {
    let sign = if t.delta >= Decimal::ZERO { "↑" } else { "↓" };
    format!("{} {}", sign, fmt_percent(&t.percent.abs()))
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let summary = dashboard_summary(&snapshot, date);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let label = get_currency_label(conn)?;
    println!(
        "{}",
        pretty_table(
            &["Figure", "Value"],
            vec![
                vec![format!("Income on {}", date), fmt_money(&summary.day_income, &label)],
                vec![
                    "Average daily income".into(),
                    fmt_money(&summary.average_daily_income, &label),
                ],
                vec!["Day vs average".into(), arrow(&summary.day_trend)],
                vec![
                    format!("Income {}", summary.month),
                    fmt_money(&summary.month_income, &label),
                ],
                vec![
                    format!("Expenses {}", summary.month),
                    fmt_money(&summary.month_expenses, &label),
                ],
                vec![
                    format!("Net {}", summary.month),
                    fmt_money(&summary.month_net, &label),
                ],
            ],
        )
    );
    let rows = summary
        .ships
        .iter()
        .map(|c| {
            vec![
                c.ship_name.clone(),
                fmt_money(&c.day_income, &label),
                fmt_money(&c.this_month_income, &label),
                fmt_money(&c.last_month_income, &label),
                arrow(&c.trend),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Ship", "Day Income", "This Month", "Last Month", "Trend"],
            rows
        )
    );
    Ok(())
}

fn daily(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let ship = ship_filter(&snapshot, sub)?;
    let series: Vec<_> = daily_income_series(&snapshot.ships, &snapshot.incomes, month)
        .into_iter()
        .filter(|s| ship.is_none_or(|id| s.ship_id == id))
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        return Ok(());
    }
    let mut headers = vec!["Date".to_string()];
    headers.extend(series.iter().map(|s| s.ship_name.clone()));
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows = month
        .days()
        .enumerate()
        .map(|(i, d)| {
            let mut row = vec![d.to_string()];
            row.extend(series.iter().map(|s| format!("{:.2}", s.points[i].1)));
            row
        })
        .collect();
    println!("{}", pretty_table(&header_refs, rows));
    Ok(())
}

fn partners(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let report = partner_statements(&snapshot, month);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let label = get_currency_label(conn)?;
    for ship in &report.ships {
        println!("{} - {}", ship.ship_name, month);
        let mut rows: Vec<Vec<String>> = ship
            .partners
            .iter()
            .map(|l| {
                vec![
                    l.partner_name.clone(),
                    fmt_money(&l.share_amount, &label),
                    format!("{:.2}%", l.share_percentage),
                    fmt_money(&l.payable, &label),
                ]
            })
            .collect();
        rows.push(vec![
            "Total Payable".into(),
            String::new(),
            String::new(),
            fmt_money(&ship.total_payable, &label),
        ]);
        println!(
            "{}",
            pretty_table(
                &["Partner", "Share Amount", "Share %", "Payable Amount"],
                rows
            )
        );
        println!("Ship Cost: {}", fmt_money(&ship.purchase_cost, &label));
        println!("Net Profit (Month): {}", fmt_money(&ship.totals.net_profit, &label));
        println!(
            "Benefit per {}: {}",
            BENEFIT_UNIT,
            fmt_money(&ship.benefit_per_unit, &label)
        );
        println!("Number of Partners: {}", ship.partners.len());
        println!();
    }
    for w in &report.warnings {
        eprintln!("warning: {}", w);
    }
    Ok(())
}

fn slips(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let report = partner_statements(&snapshot, month);
    let slips = partner_slips(&report);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &slips)? {
        return Ok(());
    }
    let label = get_currency_label(conn)?;
    for s in &slips {
        let title = s.month.to_string();
        println!(
            "{}",
            pretty_table(
                &[title.as_str(), ""],
                vec![
                    vec!["Ship Name".into(), s.ship_name.clone()],
                    vec!["Purchase Cost".into(), format!("{:.2}", s.purchase_cost)],
                    vec!["Partner Name".into(), s.partner_name.clone()],
                    vec!["Share Amount".into(), format!("{:.2}", s.share_amount)],
                    vec!["Net Profit".into(), format!("{:.2}", s.net_profit)],
                    vec!["Benefit/1 Lac".into(), format!("{:.2}", s.benefit_per_unit)],
                    vec!["Payable".into(), fmt_money(&s.payable, &label)],
                ],
            )
        );
    }
    for w in &report.warnings {
        eprintln!("warning: {}", w);
    }
    Ok(())
}
