// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::error::Result as LedgerResult;
use crate::models::{
    DailyIncome, Expense, MonthlyProfit, Partner, Project, Ship, Snapshot, YearMonth,
};
use crate::source::RecordSource;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Shipledger", "shipledger"));

pub fn db_path(cfg: &AppConfig) -> Result<PathBuf> {
    if let Some(p) = &cfg.db_path {
        return Ok(p.clone());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("shipledger.sqlite"))
}

pub fn open_or_init(cfg: &AppConfig) -> Result<Connection> {
    let path = db_path(cfg)?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS ships(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        purchase_cost TEXT,
        purchase_date TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- ship references are not foreign keys: records synced from the backend
    -- may point at ships that were deleted there, and doctor reports them.
    CREATE TABLE IF NOT EXISTS partners(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ship_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        share_percentage TEXT NOT NULL DEFAULT '0',
        email TEXT,
        phone TEXT,
        is_active INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS projects(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ship_id INTEGER,
        name TEXT NOT NULL,
        budget TEXT,
        daily_rate TEXT NOT NULL DEFAULT '0',
        start_date TEXT,
        end_date TEXT,
        status TEXT,
        is_active INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS incomes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ship_id INTEGER NOT NULL,
        project_id INTEGER,
        amount TEXT NOT NULL,
        date TEXT,
        description TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_incomes_date ON incomes(date);

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ship_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        date TEXT,
        category TEXT,
        description TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS monthly_profits(
        ship_id INTEGER NOT NULL,
        month TEXT NOT NULL, -- YYYY-MM
        total_income TEXT NOT NULL,
        total_expenses TEXT NOT NULL,
        net_profit TEXT NOT NULL,
        calculated_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(ship_id, month)
    );
    "#,
    )?;
    Ok(())
}

fn dec(s: Option<String>) -> Option<Decimal> {
    s.and_then(|s| s.trim().parse::<Decimal>().ok())
}

fn day(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

fn opt_date(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.to_string())
}

fn opt_dec(d: Option<Decimal>) -> Option<String> {
    d.map(|d| d.to_string())
}

/// Reads records from the local ledger.
pub struct SqliteSource<'a>(pub &'a Connection);

impl RecordSource for SqliteSource<'_> {
    fn fetch_ships(&self) -> LedgerResult<Vec<Ship>> {
        let mut stmt = self.0.prepare(
            "SELECT id, name, purchase_cost, purchase_date, is_active FROM ships ORDER BY id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(Ship {
                id: r.get(0)?,
                name: r.get(1)?,
                purchase_cost: dec(r.get(2)?),
                purchase_date: day(r.get(3)?),
                is_active: r.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn fetch_partners(&self) -> LedgerResult<Vec<Partner>> {
        let mut stmt = self.0.prepare(
            "SELECT id, ship_id, name, share_percentage, email, phone, is_active
             FROM partners ORDER BY id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(Partner {
                id: r.get(0)?,
                ship_id: r.get(1)?,
                name: r.get(2)?,
                share_percentage: dec(r.get(3)?).unwrap_or(Decimal::ZERO),
                email: r.get(4)?,
                phone: r.get(5)?,
                is_active: r.get(6)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn fetch_projects(&self) -> LedgerResult<Vec<Project>> {
        let mut stmt = self.0.prepare(
            "SELECT id, ship_id, name, budget, daily_rate, start_date, end_date, status, is_active
             FROM projects ORDER BY id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(Project {
                id: r.get(0)?,
                ship_id: r.get(1)?,
                name: r.get(2)?,
                budget: dec(r.get(3)?),
                daily_rate: dec(r.get(4)?).unwrap_or(Decimal::ZERO),
                start_date: day(r.get(5)?),
                end_date: day(r.get(6)?),
                status: r.get(7)?,
                is_active: r.get(8)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn fetch_incomes(&self) -> LedgerResult<Vec<DailyIncome>> {
        let mut stmt = self.0.prepare(
            "SELECT id, ship_id, project_id, amount, date, description FROM incomes ORDER BY id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(DailyIncome {
                id: r.get(0)?,
                ship_id: r.get(1)?,
                project_id: r.get(2)?,
                amount: dec(r.get(3)?).unwrap_or(Decimal::ZERO),
                date: day(r.get(4)?),
                description: r.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn fetch_expenses(&self) -> LedgerResult<Vec<Expense>> {
        let mut stmt = self.0.prepare(
            "SELECT id, ship_id, amount, date, category, description FROM expenses ORDER BY id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(Expense {
                id: r.get(0)?,
                ship_id: r.get(1)?,
                amount: dec(r.get(2)?).unwrap_or(Decimal::ZERO),
                date: day(r.get(3)?),
                category: r.get(4)?,
                description: r.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn fetch_profits(&self) -> LedgerResult<Vec<MonthlyProfit>> {
        let mut stmt = self.0.prepare(
            "SELECT ship_id, month, total_income, total_expenses, net_profit
             FROM monthly_profits ORDER BY month, ship_id",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let ship_id: i64 = r.get(0)?;
            let month_s: String = r.get(1)?;
            let Ok(month) = month_s.parse::<YearMonth>() else {
                tracing::warn!(ship_id, month = %month_s, "skipping stored profit with bad month");
                continue;
            };
            out.push(MonthlyProfit {
                ship_id,
                month,
                total_income: dec(r.get(2)?).unwrap_or(Decimal::ZERO),
                total_expenses: dec(r.get(3)?).unwrap_or(Decimal::ZERO),
                net_profit: dec(r.get(4)?).unwrap_or(Decimal::ZERO),
            });
        }
        Ok(out)
    }
}

pub fn store_profit(conn: &Connection, p: &MonthlyProfit) -> Result<()> {
    conn.execute(
        "INSERT INTO monthly_profits(ship_id, month, total_income, total_expenses, net_profit)
         VALUES (?1,?2,?3,?4,?5)
         ON CONFLICT(ship_id, month) DO UPDATE SET
            total_income=excluded.total_income,
            total_expenses=excluded.total_expenses,
            net_profit=excluded.net_profit,
            calculated_at=datetime('now')",
        params![
            p.ship_id,
            p.month.to_string(),
            p.total_income.to_string(),
            p.total_expenses.to_string(),
            p.net_profit.to_string()
        ],
    )?;
    Ok(())
}

/// Replaces every record table with the contents of `snap`, keeping backend ids.
pub fn replace_snapshot(conn: &mut Connection, snap: &Snapshot) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM partners; DELETE FROM projects; DELETE FROM incomes;
         DELETE FROM expenses; DELETE FROM monthly_profits; DELETE FROM ships;",
    )?;
    for s in &snap.ships {
        tx.execute(
            "INSERT INTO ships(id, name, purchase_cost, purchase_date, is_active)
             VALUES (?1,?2,?3,?4,?5)",
            params![
                s.id,
                s.name,
                opt_dec(s.purchase_cost),
                opt_date(s.purchase_date),
                s.is_active
            ],
        )?;
    }
    for p in &snap.partners {
        tx.execute(
            "INSERT INTO partners(id, ship_id, name, share_percentage, email, phone, is_active)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                p.id,
                p.ship_id,
                p.name,
                p.share_percentage.to_string(),
                p.email,
                p.phone,
                p.is_active
            ],
        )?;
    }
    for p in &snap.projects {
        tx.execute(
            "INSERT INTO projects(id, ship_id, name, budget, daily_rate, start_date, end_date, status, is_active)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                p.id,
                p.ship_id,
                p.name,
                opt_dec(p.budget),
                p.daily_rate.to_string(),
                opt_date(p.start_date),
                opt_date(p.end_date),
                p.status,
                p.is_active
            ],
        )?;
    }
    for i in &snap.incomes {
        tx.execute(
            "INSERT INTO incomes(id, ship_id, project_id, amount, date, description)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                i.id,
                i.ship_id,
                i.project_id,
                i.amount.to_string(),
                opt_date(i.date),
                i.description
            ],
        )?;
    }
    for e in &snap.expenses {
        tx.execute(
            "INSERT INTO expenses(id, ship_id, amount, date, category, description)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                e.id,
                e.ship_id,
                e.amount.to_string(),
                opt_date(e.date),
                e.category,
                e.description
            ],
        )?;
    }
    for p in &snap.profits {
        store_profit(&tx, p)?;
    }
    tx.commit()?;
    tracing::info!(
        ships = snap.ships.len(),
        partners = snap.partners.len(),
        incomes = snap.incomes.len(),
        expenses = snap.expenses.len(),
        "ledger replaced from snapshot"
    );
    Ok(())
}
