// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::load_snapshot;
use crate::config::AppConfig;
use crate::engine::integrity_warnings;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    let snapshot = load_snapshot(conn, sub, cfg)?;
    let warnings = integrity_warnings(&snapshot);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &warnings)? {
        return Ok(());
    }
    if warnings.is_empty() {
        println!("✅ doctor: no issues found");
        return Ok(());
    }
    let rows = warnings
        .iter()
        .map(|w| {
            let kind = serde_json::to_value(w)
                .ok()
                .and_then(|v| v.get("kind").and_then(|k| k.as_str()).map(str::to_string))
                .unwrap_or_default();
            vec![kind, w.to_string()]
        })
        .collect();
    println!("{}", pretty_table(&["Issue", "Detail"], rows));
    Ok(())
}
