// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where records come from: the local ledger or the REST backend.

use crate::error::Result;
use crate::models::{DailyIncome, Expense, MonthlyProfit, Partner, Project, Ship, Snapshot};

pub trait RecordSource {
    fn fetch_ships(&self) -> Result<Vec<Ship>>;
    fn fetch_partners(&self) -> Result<Vec<Partner>>;
    fn fetch_projects(&self) -> Result<Vec<Project>>;
    fn fetch_incomes(&self) -> Result<Vec<DailyIncome>>;
    fn fetch_expenses(&self) -> Result<Vec<Expense>>;
    fn fetch_profits(&self) -> Result<Vec<MonthlyProfit>>;
}

impl Snapshot {
    pub fn load<S: RecordSource + ?Sized>(src: &S) -> Result<Self> {
        Ok(Self {
            ships: src.fetch_ships()?,
            partners: src.fetch_partners()?,
            projects: src.fetch_projects()?,
            incomes: src.fetch_incomes()?,
            expenses: src.fetch_expenses()?,
            profits: src.fetch_profits()?,
        })
    }
}
