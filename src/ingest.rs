// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns loosely shaped JSON records into typed models.
//!
//! This is the only place that deals with missing or malformed fields. Numbers
//! may arrive as JSON numbers, strings (with thousands separators) or null;
//! anything unusable becomes zero. Records without an id are dropped.

use crate::error::{LedgerError, Result};
use crate::models::{DailyIncome, Expense, MonthlyProfit, Partner, Project, Ship, Snapshot, YearMonth};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Extracts the record list from either a bare array or a paginated page.
/// Returns the records and the `next` page URL, if any.
pub fn split_page(payload: Value, origin: &str) -> Result<(Vec<Value>, Option<String>)> {
    match payload {
        Value::Array(items) => Ok((items, None)),
        Value::Object(mut obj) => {
            let next = obj
                .get("next")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            match obj.remove("results") {
                Some(Value::Array(items)) => Ok((items, next)),
                Some(Value::Null) | None => Ok((Vec::new(), next)),
                Some(_) => Err(LedgerError::Payload(origin.to_string())),
            }
        }
        _ => Err(LedgerError::Payload(origin.to_string())),
    }
}

pub fn decimal(v: Option<&Value>) -> Option<Decimal> {
    match v? {
        Value::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .ok()
        }
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return None;
            }
            Decimal::from_str(&cleaned)
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .ok()
        }
        _ => None,
    }
}

/// Decimal that must not be negative; missing, malformed and negative all map to zero.
pub fn non_negative(v: Option<&Value>) -> Decimal {
    decimal(v)
        .filter(|d| !d.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

pub fn integer(v: Option<&Value>) -> Option<i64> {
    match v? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        // Some endpoints nest the related record instead of returning its id.
        Value::Object(o) => integer(o.get("id")),
        _ => None,
    }
}

pub fn date(v: Option<&Value>) -> Option<NaiveDate> {
    let s = v?.as_str()?.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag(v: Option<&Value>, default: bool) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().map(|i| i != 0).unwrap_or(default),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => default,
        },
        _ => default,
    }
}

fn record<'a>(v: &'a Value, kind: &str) -> Option<(i64, &'a Map<String, Value>)> {
    let Some(obj) = v.as_object() else {
        tracing::warn!(kind, "dropping non-object record");
        return None;
    };
    match integer(obj.get("id")) {
        Some(id) => Some((id, obj)),
        None => {
            tracing::warn!(kind, "dropping record without a usable id");
            None
        }
    }
}

fn ship_ref(obj: &Map<String, Value>, id: i64, kind: &str) -> Option<i64> {
    let r = integer(obj.get("ship"));
    if r.is_none() {
        tracing::warn!(kind, id, "dropping record without a ship reference");
    }
    r
}

pub fn ship(v: &Value) -> Option<Ship> {
    let (id, o) = record(v, "ship")?;
    Some(Ship {
        id,
        name: text(o.get("name")).unwrap_or_default(),
        purchase_cost: decimal(o.get("purchase_cost")).map(|d| d.max(Decimal::ZERO)),
        purchase_date: date(o.get("purchase_date")),
        is_active: flag(o.get("is_active"), true),
    })
}

pub fn partner(v: &Value) -> Option<Partner> {
    let (id, o) = record(v, "partner")?;
    Some(Partner {
        id,
        ship_id: ship_ref(o, id, "partner")?,
        name: text(o.get("name")).unwrap_or_default(),
        share_percentage: non_negative(o.get("share_percentage")),
        email: text(o.get("email")),
        phone: text(o.get("phone")),
        is_active: flag(o.get("is_active"), true),
    })
}

pub fn income(v: &Value) -> Option<DailyIncome> {
    let (id, o) = record(v, "income")?;
    Some(DailyIncome {
        id,
        ship_id: ship_ref(o, id, "income")?,
        project_id: integer(o.get("project")),
        amount: non_negative(o.get("amount")),
        date: date(o.get("date")),
        description: text(o.get("description")),
    })
}

pub fn expense(v: &Value) -> Option<Expense> {
    let (id, o) = record(v, "expense")?;
    Some(Expense {
        id,
        ship_id: ship_ref(o, id, "expense")?,
        amount: non_negative(o.get("amount")),
        date: date(o.get("date")),
        category: text(o.get("category")),
        description: text(o.get("description")),
    })
}

pub fn project(v: &Value) -> Option<Project> {
    let (id, o) = record(v, "project")?;
    Some(Project {
        id,
        ship_id: integer(o.get("ship")),
        name: text(o.get("name")).unwrap_or_default(),
        budget: decimal(o.get("budget")).map(|d| d.max(Decimal::ZERO)),
        daily_rate: non_negative(o.get("daily_rate")),
        start_date: date(o.get("start_date")),
        end_date: date(o.get("end_date")),
        status: text(o.get("status")),
        is_active: flag(o.get("is_active"), true),
    })
}

/// Stored profits carry their own id on the backend, but are keyed by ship and month here.
pub fn profit(v: &Value) -> Option<MonthlyProfit> {
    let o = v.as_object()?;
    let ship_id = integer(o.get("ship"))?;
    let month = o
        .get("month")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<YearMonth>().ok())
        .or_else(|| date(o.get("month")).map(YearMonth::from_date));
    let Some(month) = month else {
        tracing::warn!(ship_id, "dropping profit record without a usable month");
        return None;
    };
    Some(MonthlyProfit {
        ship_id,
        month,
        total_income: decimal(o.get("total_income")).unwrap_or(Decimal::ZERO),
        total_expenses: decimal(o.get("total_expenses")).unwrap_or(Decimal::ZERO),
        net_profit: decimal(o.get("net_profit")).unwrap_or(Decimal::ZERO),
    })
}

pub fn many<T>(values: &[Value], f: fn(&Value) -> Option<T>) -> Vec<T> {
    values.iter().filter_map(f).collect()
}

/// Reads a snapshot file: an object with one array (or page) per record kind.
pub fn snapshot_from_json(payload: Value) -> Result<Snapshot> {
    let Value::Object(mut obj) = payload else {
        return Err(LedgerError::Payload("snapshot".into()));
    };
    let mut take = |key: &str| -> Result<Vec<Value>> {
        match obj.remove(key) {
            Some(v) => split_page(v, key).map(|(items, _)| items),
            None => Ok(Vec::new()),
        }
    };
    Ok(Snapshot {
        ships: many(&take("ships")?, ship),
        partners: many(&take("partners")?, partner),
        projects: many(&take("projects")?, project),
        incomes: many(&take("incomes")?, income),
        expenses: many(&take("expenses")?, expense),
        profits: many(&take("profits")?, profit),
    })
}
