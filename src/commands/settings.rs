// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::db::db_path;
use crate::utils::{get_currency_label, pretty_table, set_currency_label};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &AppConfig) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec!["ledger".into(), db_path(cfg)?.display().to_string()],
                vec![
                    "api_base_url".into(),
                    cfg.api_base_url.clone().unwrap_or_else(|| "(not set)".into()),
                ],
                vec!["timeout_secs".into(), cfg.timeout.as_secs().to_string()],
                vec!["currency_label".into(), get_currency_label(conn)?],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-currency", sub)) => {
            let label = sub.get_one::<String>("label").unwrap().trim();
            if label.is_empty() {
                return Err(anyhow!("Currency label must not be empty"));
            }
            set_currency_label(conn, label)?;
            println!("Currency label set to {}", label);
        }
        _ => {}
    }
    Ok(())
}
