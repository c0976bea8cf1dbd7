// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::db::replace_snapshot;
use crate::models::Snapshot;
use crate::source::RecordSource;
use crate::utils::{parse_month, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    match m.subcommand() {
        Some(("pull", _)) => pull(conn, cfg)?,
        Some(("push", sub)) => push(sub, cfg)?,
        _ => {}
    }
    Ok(())
}

fn pull(conn: &mut Connection, cfg: &AppConfig) -> Result<()> {
    let client = ApiClient::from_config(cfg)?;
    let snap = Snapshot::load(&client).context("Fetch records from backend")?;
    replace_snapshot(conn, &snap)?;
    println!(
        "Pulled {} ships, {} partners, {} projects, {} incomes, {} expenses, {} profits",
        snap.ships.len(),
        snap.partners.len(),
        snap.projects.len(),
        snap.incomes.len(),
        snap.expenses.len(),
        snap.profits.len()
    );
    Ok(())
}

fn push(sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let client = ApiClient::from_config(cfg)?;
    let ships = client.fetch_ships().context("Fetch ships from backend")?;
    let ids: Vec<i64> = ships.iter().filter(|s| s.is_active).map(|s| s.id).collect();
    let results = client.submit_all(&ids, month);

    let failed = results.values().filter(|r| r.is_err()).count();
    let rows = results
        .iter()
        .map(|(id, r)| {
            let name = ships
                .iter()
                .find(|s| s.id == *id)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            match r {
                Ok(()) => vec![id.to_string(), name, "ok".into(), String::new()],
                Err(e) => vec![id.to_string(), name, "failed".into(), e.clone()],
            }
        })
        .collect();
    println!("{}", pretty_table(&["ID", "Ship", "Status", "Reason"], rows));
    tracing::info!(%month, submitted = ids.len(), failed, "remote profit calculation finished");
    if failed > 0 && failed == ids.len() {
        return Err(anyhow!("Profit calculation failed for every ship for {}", month));
    }
    Ok(())
}
