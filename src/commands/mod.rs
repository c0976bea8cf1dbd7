// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod importer;
pub mod incomes;
pub mod partners;
pub mod profits;
pub mod projects;
pub mod reports;
pub mod settings;
pub mod ships;
pub mod sync;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::db::SqliteSource;
use crate::models::Snapshot;
use anyhow::{Context, Result};
use rusqlite::Connection;

/// Loads records from the backend when `--remote` is given, else from the ledger.
pub fn load_snapshot(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<Snapshot> {
    if sub.get_flag("remote") {
        let client = ApiClient::from_config(cfg)?;
        Snapshot::load(&client).context("Fetch records from backend")
    } else {
        Snapshot::load(&SqliteSource(conn)).context("Read records from ledger")
    }
}

/// Resolves `--ship` (id or exact name) against the loaded ships.
pub fn ship_filter(snapshot: &Snapshot, sub: &clap::ArgMatches) -> Result<Option<i64>> {
    let Some(raw) = sub.get_one::<String>("ship") else {
        return Ok(None);
    };
    let key = raw.trim();
    let found = match key.parse::<i64>() {
        Ok(id) => snapshot.ship(id),
        Err(_) => snapshot.ships.iter().find(|s| s.name == key),
    };
    found
        .map(|s| Some(s.id))
        .with_context(|| format!("Ship '{}' not found", key))
}
