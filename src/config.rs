// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Base URL of the REST backend, e.g. `https://ships.example.com/api/`.
    pub api_base_url: Option<String>,
    pub timeout: Duration,
    /// Overrides the platform data dir location of the ledger database.
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let timeout_secs = match env::var("SHIPLEDGER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid SHIPLEDGER_TIMEOUT_SECS '{}'", raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            api_base_url: env::var("SHIPLEDGER_API_URL")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
            db_path: env::var("SHIPLEDGER_DB")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}
