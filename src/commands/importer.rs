// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::replace_snapshot;
use crate::ingest::snapshot_from_json;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs::File;
use std::io::BufReader;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshot", sub)) => import_snapshot(conn, sub),
        _ => Ok(()),
    }
}

fn import_snapshot(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let file = File::open(path).with_context(|| format!("Open snapshot {}", path))?;
    let payload: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Parse snapshot {}", path))?;
    let snap = snapshot_from_json(payload).with_context(|| format!("Read snapshot {}", path))?;
    replace_snapshot(conn, &snap)?;
    println!(
        "Imported {} ships, {} partners, {} projects, {} incomes, {} expenses, {} profits from {}",
        snap.ships.len(),
        snap.partners.len(),
        snap.projects.len(),
        snap.incomes.len(),
        snap.expenses.len(),
        snap.profits.len(),
        path
    );
    Ok(())
}
