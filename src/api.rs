// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the ship management REST backend.

use crate::config::AppConfig;
use crate::error::{LedgerError, Result};
use crate::ingest;
use crate::models::{DailyIncome, Expense, MonthlyProfit, Partner, Project, Ship, YearMonth};
use crate::source::RecordSource;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

const UA: &str = concat!("shipledger/", env!("CARGO_PKG_VERSION"));

/// Follows at most this many `next` links per listing.
const MAX_PAGES: usize = 500;

pub struct ApiClient {
    base: String,
    http: Client,
}

#[derive(Debug, Serialize)]
struct CalculateProfit<'a> {
    ship_id: i64,
    month: &'a str,
}

impl ApiClient {
    pub fn new(base: &str, timeout: std::time::Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).user_agent(UA).build()?;
        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self { base, http })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let base = cfg
            .api_base_url
            .as_deref()
            .ok_or(LedgerError::Config("SHIPLEDGER_API_URL is not set"))?;
        Self::new(base, cfg.timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    fn check(method: &'static str, url: &str, resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        Err(LedgerError::Status {
            method,
            url: url.to_string(),
            status: status.as_u16(),
            body: error_message(&body),
        })
    }

    /// Every record of a listing endpoint, across pages.
    pub fn get_list(&self, path: &str) -> Result<Vec<Value>> {
        let mut url = self.url(path);
        let mut out = Vec::new();
        for _ in 0..MAX_PAGES {
            tracing::debug!(%url, "GET");
            let resp = Self::check("GET", &url, self.http.get(&url).send()?)?;
            let (items, next) = ingest::split_page(resp.json::<Value>()?, path)?;
            out.extend(items);
            match next {
                Some(n) => url = n,
                None => return Ok(out),
            }
        }
        tracing::warn!(path, pages = MAX_PAGES, "stopped following pagination");
        Ok(out)
    }

    /// Asks the backend to (re)compute and store one ship's monthly profit.
    pub fn submit_profit_calculation(&self, ship_id: i64, month: YearMonth) -> Result<()> {
        let url = self.url("profits/calculate_profit/");
        let m = month.to_string();
        let body = CalculateProfit {
            ship_id,
            month: &m,
        };
        tracing::debug!(%url, ship_id, %month, "POST");
        Self::check("POST", &url, self.http.post(&url).json(&body).send()?)?;
        Ok(())
    }

    /// One request per ship; a failed ship does not stop the others.
    pub fn submit_all(
        &self,
        ship_ids: &[i64],
        month: YearMonth,
    ) -> BTreeMap<i64, std::result::Result<(), String>> {
        let mut out = BTreeMap::new();
        for id in ship_ids {
            let r = self
                .submit_profit_calculation(*id, month)
                .map_err(|e| e.to_string());
            if let Err(ref e) = r {
                tracing::warn!(ship_id = *id, %month, error = %e, "remote profit calculation failed");
            }
            out.insert(*id, r);
        }
        out
    }
}

/// Pulls `error`/`detail` out of a JSON error body when present.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(v) => v
            .get("error")
            .or_else(|| v.get("detail"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| v.to_string()),
        Err(_) => body.chars().take(200).collect(),
    }
}

impl RecordSource for ApiClient {
    fn fetch_ships(&self) -> Result<Vec<Ship>> {
        Ok(ingest::many(&self.get_list("ships/")?, ingest::ship))
    }

    fn fetch_partners(&self) -> Result<Vec<Partner>> {
        Ok(ingest::many(&self.get_list("partners/")?, ingest::partner))
    }

    fn fetch_projects(&self) -> Result<Vec<Project>> {
        Ok(ingest::many(&self.get_list("projects/")?, ingest::project))
    }

    fn fetch_incomes(&self) -> Result<Vec<DailyIncome>> {
        Ok(ingest::many(&self.get_list("incomes/")?, ingest::income))
    }

    fn fetch_expenses(&self) -> Result<Vec<Expense>> {
        Ok(ingest::many(&self.get_list("expenses/")?, ingest::expense))
    }

    fn fetch_profits(&self) -> Result<Vec<MonthlyProfit>> {
        Ok(ingest::many(&self.get_list("profits/")?, ingest::profit))
    }
}
