// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Profit and partner-share aggregation.
//!
//! Every function here is pure: it reads immutable record slices and returns
//! new values. All arithmetic is in [`Decimal`], division goes through checked
//! operations, and any division by zero is defined as zero, so results are
//! always finite and no function returns an error for a whole computation.

use crate::models::{DailyIncome, Expense, MonthlyProfit, Partner, Ship, Snapshot, YearMonth};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Capital unit used to normalise benefit across ships (one lakh).
pub const BENEFIT_UNIT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MonthlyTotals {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Trend {
    pub delta: Decimal,
    pub percent: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PartnerShare {
    /// Nominal capital stake; informational, never paid out.
    pub share_amount: Decimal,
    pub payable: Decimal,
}

fn sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

fn percent_of(value: Decimal, pct: Decimal) -> Decimal {
    value
        .checked_mul(pct)
        .and_then(|v| v.checked_div(HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

fn in_month(date: Option<NaiveDate>, month: YearMonth) -> bool {
    date.is_some_and(|d| month.contains(d))
}

pub fn income_for_month(ship_id: i64, incomes: &[DailyIncome], month: YearMonth) -> Decimal {
    sum(incomes
        .iter()
        .filter(|i| i.ship_id == ship_id && in_month(i.date, month))
        .map(|i| i.amount))
}

pub fn expenses_for_month(ship_id: i64, expenses: &[Expense], month: YearMonth) -> Decimal {
    sum(expenses
        .iter()
        .filter(|e| e.ship_id == ship_id && in_month(e.date, month))
        .map(|e| e.amount))
}

pub fn monthly_totals(
    ship_id: i64,
    incomes: &[DailyIncome],
    expenses: &[Expense],
    month: YearMonth,
) -> MonthlyTotals {
    let total_income = income_for_month(ship_id, incomes, month);
    let total_expenses = expenses_for_month(ship_id, expenses, month);
    MonthlyTotals {
        total_income,
        total_expenses,
        net_profit: total_income.saturating_sub(total_expenses),
    }
}

/// Signed change from `previous` to `current`. A zero baseline yields 0%.
pub fn trend(current: Decimal, previous: Decimal) -> Trend {
    let delta = current.saturating_sub(previous);
    let percent = ratio(delta, previous)
        .checked_mul(HUNDRED)
        .unwrap_or(Decimal::ZERO);
    Trend { delta, percent }
}

/// Partner's cut of a month's net profit.
///
/// `payable` is `net_profit * share_percentage / 100` and ignores the ship's
/// cost entirely. `share_amount` is the partner's slice of the purchase cost
/// and is zero when the cost is missing or zero.
pub fn partner_payable(ship: &Ship, partner: &Partner, net_profit: Decimal) -> PartnerShare {
    let cost = ship.purchase_cost.unwrap_or(Decimal::ZERO);
    let share_amount = if cost > Decimal::ZERO {
        percent_of(cost, partner.share_percentage)
    } else {
        Decimal::ZERO
    };
    PartnerShare {
        share_amount,
        payable: percent_of(net_profit, partner.share_percentage),
    }
}

/// Net profit per `unit` of capital invested; 0 for ships without a positive cost.
pub fn benefit_per_unit(ship: &Ship, net_profit: Decimal, unit: Decimal) -> Decimal {
    match ship.purchase_cost {
        Some(cost) if cost > Decimal::ZERO => ratio(net_profit, cost)
            .checked_mul(unit)
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ShipFailure {
    #[error("ship {0} has no purchase cost on file")]
    MissingPurchaseCost(i64),
}

/// Per-ship outcome of a batch profit calculation, keyed by ship id.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub month: Option<YearMonth>,
    pub results: BTreeMap<i64, Result<MonthlyProfit, ShipFailure>>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &MonthlyProfit> {
        self.results.values().filter_map(|r| r.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (i64, &ShipFailure)> {
        self.results
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| (*id, e)))
    }

    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}

fn profit_for_ship(
    ship: &Ship,
    incomes: &[DailyIncome],
    expenses: &[Expense],
    month: YearMonth,
) -> Result<MonthlyProfit, ShipFailure> {
    if ship.purchase_cost.is_none() {
        return Err(ShipFailure::MissingPurchaseCost(ship.id));
    }
    let totals = monthly_totals(ship.id, incomes, expenses, month);
    Ok(MonthlyProfit {
        ship_id: ship.id,
        month,
        total_income: totals.total_income,
        total_expenses: totals.total_expenses,
        net_profit: totals.net_profit,
    })
}

/// Computes a [`MonthlyProfit`] for every active ship. A ship that cannot be
/// computed is recorded as a failure and the others still complete.
pub fn calculate_profit_for_all_ships(
    ships: &[Ship],
    incomes: &[DailyIncome],
    expenses: &[Expense],
    month: YearMonth,
) -> BatchReport {
    let mut report = BatchReport {
        month: Some(month),
        ..Default::default()
    };
    for ship in ships.iter().filter(|s| s.is_active) {
        let outcome = profit_for_ship(ship, incomes, expenses, month);
        if let Err(ref e) = outcome {
            tracing::warn!(ship_id = ship.id, %month, error = %e, "profit calculation skipped");
        }
        report.results.insert(ship.id, outcome);
    }
    tracing::debug!(
        %month,
        ships = report.results.len(),
        complete = report.is_complete(),
        "batch profit calculation finished"
    );
    report
}

// ----- dashboard -----

pub fn day_income(incomes: &[DailyIncome], date: NaiveDate, ship_id: Option<i64>) -> Decimal {
    sum(incomes
        .iter()
        .filter(|i| i.date == Some(date) && ship_id.is_none_or(|id| i.ship_id == id))
        .map(|i| i.amount))
}

/// Month income divided by the number of income records in the month.
pub fn average_daily_income(
    incomes: &[DailyIncome],
    month: YearMonth,
    ship_id: Option<i64>,
) -> Decimal {
    let mut records = 0usize;
    let mut total = Decimal::ZERO;
    for i in incomes
        .iter()
        .filter(|i| in_month(i.date, month) && ship_id.is_none_or(|id| i.ship_id == id))
    {
        records += 1;
        total = total.saturating_add(i.amount);
    }
    ratio(total, Decimal::from(records))
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipIncomeCard {
    pub ship_id: i64,
    pub ship_name: String,
    pub day_income: Decimal,
    pub this_month_income: Decimal,
    pub last_month_income: Decimal,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub month: YearMonth,
    pub day_income: Decimal,
    pub average_daily_income: Decimal,
    pub day_trend: Trend,
    pub month_income: Decimal,
    pub month_expenses: Decimal,
    pub month_net: Decimal,
    pub ships: Vec<ShipIncomeCard>,
}

pub fn dashboard_summary(snapshot: &Snapshot, date: NaiveDate) -> DashboardSummary {
    let month = YearMonth::from_date(date);
    let previous = month.previous();
    let day_total = day_income(&snapshot.incomes, date, None);
    let average = average_daily_income(&snapshot.incomes, month, None);
    let month_income = sum(snapshot
        .incomes
        .iter()
        .filter(|i| in_month(i.date, month))
        .map(|i| i.amount));
    let month_expenses = sum(snapshot
        .expenses
        .iter()
        .filter(|e| in_month(e.date, month))
        .map(|e| e.amount));

    let ships = snapshot
        .ships
        .iter()
        .map(|ship| {
            let this_month = income_for_month(ship.id, &snapshot.incomes, month);
            let last_month = income_for_month(ship.id, &snapshot.incomes, previous);
            ShipIncomeCard {
                ship_id: ship.id,
                ship_name: ship.name.clone(),
                day_income: day_income(&snapshot.incomes, date, Some(ship.id)),
                this_month_income: this_month,
                last_month_income: last_month,
                trend: trend(this_month, last_month),
            }
        })
        .collect();

    DashboardSummary {
        date,
        month,
        day_income: day_total,
        average_daily_income: average,
        day_trend: trend(day_total, average),
        month_income,
        month_expenses,
        month_net: month_income.saturating_sub(month_expenses),
        ships,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipSeries {
    pub ship_id: i64,
    pub ship_name: String,
    pub points: Vec<(NaiveDate, Decimal)>,
}

/// Income per calendar day of `month` for each ship, zero-filled.
pub fn daily_income_series(
    ships: &[Ship],
    incomes: &[DailyIncome],
    month: YearMonth,
) -> Vec<ShipSeries> {
    let mut by_key: HashMap<(i64, NaiveDate), Decimal> = HashMap::new();
    for i in incomes.iter().filter(|i| in_month(i.date, month)) {
        if let Some(d) = i.date {
            let slot = by_key.entry((i.ship_id, d)).or_insert(Decimal::ZERO);
            *slot = slot.saturating_add(i.amount);
        }
    }
    ships
        .iter()
        .map(|ship| ShipSeries {
            ship_id: ship.id,
            ship_name: ship.name.clone(),
            points: month
                .days()
                .map(|d| {
                    let v = by_key.get(&(ship.id, d)).copied().unwrap_or(Decimal::ZERO);
                    (d, v)
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitHistoryRow {
    pub profit: MonthlyProfit,
    /// Against the same ship's previous calendar month, when one is on file.
    pub trend: Option<Trend>,
}

pub fn profit_history(profits: &[MonthlyProfit]) -> Vec<ProfitHistoryRow> {
    let mut ordered: Vec<&MonthlyProfit> = profits.iter().collect();
    ordered.sort_by_key(|p| (p.ship_id, p.month));
    let index: HashMap<(i64, YearMonth), Decimal> = ordered
        .iter()
        .map(|p| ((p.ship_id, p.month), p.net_profit))
        .collect();
    ordered
        .into_iter()
        .map(|p| ProfitHistoryRow {
            profit: p.clone(),
            trend: index
                .get(&(p.ship_id, p.month.previous()))
                .map(|prev| trend(p.net_profit, *prev)),
        })
        .collect()
}

// ----- partner reporting -----

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    OrphanPartner { partner_id: i64, ship_id: i64 },
    OrphanIncome { income_id: i64, ship_id: i64 },
    OrphanExpense { expense_id: i64, ship_id: i64 },
    ShareOverflow { ship_id: i64, total: Decimal },
    MissingPurchaseCost { ship_id: i64 },
    UndatedIncome { income_id: i64 },
    UndatedExpense { expense_id: i64 },
    ProfitMismatch(ProfitMismatch),
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrphanPartner { partner_id, ship_id } => {
                write!(f, "partner {} references unknown ship {}", partner_id, ship_id)
            }
            Self::OrphanIncome { income_id, ship_id } => {
                write!(f, "income {} references unknown ship {}", income_id, ship_id)
            }
            Self::OrphanExpense { expense_id, ship_id } => {
                write!(f, "expense {} references unknown ship {}", expense_id, ship_id)
            }
            Self::ShareOverflow { ship_id, total } => {
                write!(f, "ship {} active partner shares sum to {}%", ship_id, total)
            }
            Self::MissingPurchaseCost { ship_id } => {
                write!(f, "ship {} has no purchase cost", ship_id)
            }
            Self::UndatedIncome { income_id } => write!(f, "income {} has no valid date", income_id),
            Self::UndatedExpense { expense_id } => {
                write!(f, "expense {} has no valid date", expense_id)
            }
            Self::ProfitMismatch(m) => write!(
                f,
                "stored profit for ship {} {} has {} {} but records give {}",
                m.ship_id, m.month, m.field, m.stored, m.computed
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerLine {
    pub partner_id: i64,
    pub partner_name: String,
    pub share_percentage: Decimal,
    pub share_amount: Decimal,
    pub payable: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipStatement {
    pub ship_id: i64,
    pub ship_name: String,
    pub purchase_cost: Decimal,
    pub totals: MonthlyTotals,
    pub benefit_per_unit: Decimal,
    pub partners: Vec<PartnerLine>,
    pub total_payable: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerReport {
    pub month: YearMonth,
    pub ships: Vec<ShipStatement>,
    pub warnings: Vec<IntegrityWarning>,
}

pub fn partner_statements(snapshot: &Snapshot, month: YearMonth) -> PartnerReport {
    let mut warnings = Vec::new();
    let mut by_ship: BTreeMap<i64, Vec<&Partner>> = BTreeMap::new();
    for p in snapshot.partners.iter().filter(|p| p.is_active) {
        if snapshot.ship(p.ship_id).is_none() {
            tracing::warn!(partner_id = p.id, ship_id = p.ship_id, "partner skipped: unknown ship");
            warnings.push(IntegrityWarning::OrphanPartner {
                partner_id: p.id,
                ship_id: p.ship_id,
            });
            continue;
        }
        by_ship.entry(p.ship_id).or_default().push(p);
    }

    let ships = snapshot
        .ships
        .iter()
        .filter_map(|ship| {
            let partners = by_ship.get(&ship.id)?;
            let totals = monthly_totals(ship.id, &snapshot.incomes, &snapshot.expenses, month);
            let lines: Vec<PartnerLine> = partners
                .iter()
                .map(|p| {
                    let share = partner_payable(ship, p, totals.net_profit);
                    PartnerLine {
                        partner_id: p.id,
                        partner_name: p.name.clone(),
                        share_percentage: p.share_percentage,
                        share_amount: share.share_amount,
                        payable: share.payable,
                    }
                })
                .collect();
            Some(ShipStatement {
                ship_id: ship.id,
                ship_name: ship.name.clone(),
                purchase_cost: ship.purchase_cost.unwrap_or(Decimal::ZERO),
                benefit_per_unit: benefit_per_unit(ship, totals.net_profit, BENEFIT_UNIT),
                total_payable: sum(lines.iter().map(|l| l.payable)),
                totals,
                partners: lines,
            })
        })
        .collect();

    PartnerReport {
        month,
        ships,
        warnings,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerSlip {
    pub month: YearMonth,
    pub ship_name: String,
    pub purchase_cost: Decimal,
    pub partner_name: String,
    pub share_amount: Decimal,
    pub net_profit: Decimal,
    pub benefit_per_unit: Decimal,
    pub payable: Decimal,
}

pub fn partner_slips(report: &PartnerReport) -> Vec<PartnerSlip> {
    report
        .ships
        .iter()
        .flat_map(|s| {
            s.partners.iter().map(move |l| PartnerSlip {
                month: report.month,
                ship_name: s.ship_name.clone(),
                purchase_cost: s.purchase_cost,
                partner_name: l.partner_name.clone(),
                share_amount: l.share_amount,
                net_profit: s.totals.net_profit,
                benefit_per_unit: s.benefit_per_unit,
                payable: l.payable,
            })
        })
        .collect()
}

// ----- integrity -----

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfitMismatch {
    pub ship_id: i64,
    pub month: YearMonth,
    pub field: &'static str,
    pub stored: Decimal,
    pub computed: Decimal,
}

/// Recomputes each stored profit from the raw records and lists every field that differs.
pub fn reconcile_profits(
    stored: &[MonthlyProfit],
    incomes: &[DailyIncome],
    expenses: &[Expense],
) -> Vec<ProfitMismatch> {
    let mut out = Vec::new();
    for p in stored {
        let t = monthly_totals(p.ship_id, incomes, expenses, p.month);
        for (field, s, c) in [
            ("total_income", p.total_income, t.total_income),
            ("total_expenses", p.total_expenses, t.total_expenses),
            ("net_profit", p.net_profit, t.net_profit),
        ] {
            if s != c {
                out.push(ProfitMismatch {
                    ship_id: p.ship_id,
                    month: p.month,
                    field,
                    stored: s,
                    computed: c,
                });
            }
        }
    }
    out
}

pub fn integrity_warnings(snapshot: &Snapshot) -> Vec<IntegrityWarning> {
    let known: BTreeSet<i64> = snapshot.ships.iter().map(|s| s.id).collect();
    let mut out = Vec::new();

    for p in &snapshot.partners {
        if !known.contains(&p.ship_id) {
            out.push(IntegrityWarning::OrphanPartner {
                partner_id: p.id,
                ship_id: p.ship_id,
            });
        }
    }
    for i in &snapshot.incomes {
        if !known.contains(&i.ship_id) {
            out.push(IntegrityWarning::OrphanIncome {
                income_id: i.id,
                ship_id: i.ship_id,
            });
        }
        if i.date.is_none() {
            out.push(IntegrityWarning::UndatedIncome { income_id: i.id });
        }
    }
    for e in &snapshot.expenses {
        if !known.contains(&e.ship_id) {
            out.push(IntegrityWarning::OrphanExpense {
                expense_id: e.id,
                ship_id: e.ship_id,
            });
        }
        if e.date.is_none() {
            out.push(IntegrityWarning::UndatedExpense { expense_id: e.id });
        }
    }
    for ship in &snapshot.ships {
        if ship.is_active && ship.purchase_cost.is_none() {
            out.push(IntegrityWarning::MissingPurchaseCost { ship_id: ship.id });
        }
        let total = sum(snapshot
            .partners
            .iter()
            .filter(|p| p.is_active && p.ship_id == ship.id)
            .map(|p| p.share_percentage));
        if total > HUNDRED {
            out.push(IntegrityWarning::ShareOverflow {
                ship_id: ship.id,
                total,
            });
        }
    }
    out.extend(
        reconcile_profits(&snapshot.profits, &snapshot.incomes, &snapshot.expenses)
            .into_iter()
            .map(IntegrityWarning::ProfitMismatch),
    );
    out
}
