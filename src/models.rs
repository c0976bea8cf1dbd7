// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: i64,
    pub name: String,
    /// `None` when the backend has no cost on file.
    pub purchase_cost: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub ship_id: i64,
    pub name: String,
    pub share_percentage: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyIncome {
    pub id: i64,
    pub ship_id: i64,
    pub project_id: Option<i64>,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub ship_id: i64,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub ship_id: Option<i64>,
    pub name: String,
    pub budget: Option<Decimal>,
    pub daily_rate: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProfit {
    pub ship_id: i64,
    pub month: YearMonth,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

/// Everything the engine needs for one computation, as read from a record source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub ships: Vec<Ship>,
    pub partners: Vec<Partner>,
    pub projects: Vec<Project>,
    pub incomes: Vec<DailyIncome>,
    pub expenses: Vec<Expense>,
    pub profits: Vec<MonthlyProfit>,
}

impl Snapshot {
    pub fn ship(&self, id: i64) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }
}

/// A calendar month. Serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive range check against the first and last calendar day.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_day();
        self.first_day().iter_days().take_while(move |d| *d <= last)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = LedgerError;

    // The backend stores months as first-of-month dates, so `YYYY-MM-01` is accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let candidate = if t.len() > 7 { t.to_string() } else { format!("{}-01", t) };
        NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
            .ok()
            .filter(|d| d.day() == 1)
            .map(Self::from_date)
            .ok_or_else(|| LedgerError::Month(s.to_string()))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = LedgerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(m: YearMonth) -> Self {
        m.to_string()
    }
}
