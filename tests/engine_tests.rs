// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shipledger::engine::{
    BENEFIT_UNIT, ShipFailure, benefit_per_unit, calculate_profit_for_all_ships, monthly_totals,
    partner_payable, reconcile_profits, trend,
};
use shipledger::models::{DailyIncome, Expense, MonthlyProfit, Partner, Ship, YearMonth};

fn d(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn day(y: i32, m: u32, dd: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, dd)
}

fn ship(id: i64, cost: Option<&str>) -> Ship {
    Ship {
        id,
        name: format!("Ship {}", id),
        purchase_cost: cost.map(d),
        purchase_date: None,
        is_active: true,
    }
}

fn partner(id: i64, ship_id: i64, share: &str) -> Partner {
    Partner {
        id,
        ship_id,
        name: format!("Partner {}", id),
        share_percentage: d(share),
        email: None,
        phone: None,
        is_active: true,
    }
}

fn income(id: i64, ship_id: i64, amount: &str, date: Option<NaiveDate>) -> DailyIncome {
    DailyIncome {
        id,
        ship_id,
        project_id: None,
        amount: d(amount),
        date,
        description: None,
    }
}

fn expense(id: i64, ship_id: i64, amount: &str, date: Option<NaiveDate>) -> Expense {
    Expense {
        id,
        ship_id,
        amount: d(amount),
        date,
        category: None,
        description: None,
    }
}

fn feb_2024() -> YearMonth {
    YearMonth::new(2024, 2).unwrap()
}

fn boundary_incomes() -> Vec<DailyIncome> {
    vec![
        income(1, 1, "100.00", day(2024, 1, 31)),
        income(2, 1, "250.50", day(2024, 2, 1)),
        income(3, 1, "300.25", day(2024, 2, 29)),
        income(4, 1, "75.00", day(2024, 3, 1)),
        income(5, 2, "999.00", day(2024, 2, 10)),
        income(6, 1, "40.00", None),
    ]
}

#[test]
fn month_totals_exclude_adjacent_months() {
    let incomes = boundary_incomes();
    let expenses = vec![
        expense(1, 1, "20.00", day(2024, 1, 31)),
        expense(2, 1, "50.25", day(2024, 2, 29)),
        expense(3, 1, "10.00", day(2024, 3, 1)),
    ];
    let t = monthly_totals(1, &incomes, &expenses, feb_2024());
    assert_eq!(t.total_income, d("550.75"));
    assert_eq!(t.total_expenses, d("50.25"));
    assert_eq!(t.net_profit, d("500.50"));

    let jan = monthly_totals(1, &incomes, &expenses, feb_2024().previous());
    assert_eq!(jan.total_income, d("100.00"));
    assert_eq!(jan.total_expenses, d("20.00"));
}

#[test]
fn net_profit_is_exact_difference() {
    let incomes = vec![
        income(1, 1, "0.1", day(2024, 2, 3)),
        income(2, 1, "0.2", day(2024, 2, 4)),
    ];
    let expenses = vec![expense(1, 1, "1000.33", day(2024, 2, 5))];
    let t = monthly_totals(1, &incomes, &expenses, feb_2024());
    assert_eq!(t.total_income, d("0.3"));
    assert_eq!(t.net_profit, t.total_income - t.total_expenses);
    assert_eq!(t.net_profit, d("-1000.03"));
}

#[test]
fn monthly_totals_are_idempotent() {
    let incomes = boundary_incomes();
    let expenses = vec![expense(1, 1, "12.34", day(2024, 2, 2))];
    let a = monthly_totals(1, &incomes, &expenses, feb_2024());
    let b = monthly_totals(1, &incomes, &expenses, feb_2024());
    assert_eq!(a, b);
    assert_eq!(a.net_profit.serialize(), b.net_profit.serialize());
}

#[test]
fn trend_with_zero_baseline_is_zero_percent() {
    for x in ["0", "15", "-42.5", "1000000"] {
        let t = trend(d(x), Decimal::ZERO);
        assert_eq!(t.percent, Decimal::ZERO);
        assert_eq!(t.delta, d(x));
    }
}

#[test]
fn trend_reports_signed_percentage() {
    let up = trend(d("150"), d("100"));
    assert_eq!(up.delta, d("50"));
    assert_eq!(up.percent, d("50"));

    let down = trend(d("75"), d("100"));
    assert_eq!(down.delta, d("-25"));
    assert_eq!(down.percent, d("-25"));
}

#[test]
fn payable_follows_share_of_net_profit() {
    let s = ship(1, Some("1000000"));
    let p = partner(1, 1, "10");
    let share = partner_payable(&s, &p, d("50000"));
    assert_eq!(share.share_amount, d("100000"));
    assert_eq!(share.payable, d("5000"));
}

#[test]
fn total_payable_never_exceeds_net_profit() {
    let s = ship(1, Some("1000000"));
    let partners = vec![
        partner(1, 1, "33.33"),
        partner(2, 1, "33.33"),
        partner(3, 1, "33.34"),
    ];
    let net = d("12345.67");
    let total: Decimal = partners
        .iter()
        .map(|p| partner_payable(&s, p, net).payable)
        .sum();
    assert!(total <= net);
}

#[test]
fn zero_cost_ship_is_guarded() {
    let s = ship(1, Some("0"));
    let p = partner(1, 1, "25");
    let share = partner_payable(&s, &p, d("8000"));
    assert_eq!(share.share_amount, Decimal::ZERO);
    assert_eq!(share.payable, d("2000"));
    assert_eq!(benefit_per_unit(&s, d("8000"), BENEFIT_UNIT), Decimal::ZERO);

    let missing = ship(2, None);
    let share = partner_payable(&missing, &partner(2, 2, "50"), d("100"));
    assert_eq!(share.share_amount, Decimal::ZERO);
    assert_eq!(share.payable, d("50"));
    assert_eq!(benefit_per_unit(&missing, d("100"), BENEFIT_UNIT), Decimal::ZERO);
}

#[test]
fn benefit_is_normalised_per_lakh() {
    let s = ship(1, Some("2000000"));
    assert_eq!(benefit_per_unit(&s, d("50000"), BENEFIT_UNIT), d("2500"));
}

#[test]
fn batch_isolates_ship_without_cost() {
    let ships = vec![ship(1, Some("500000")), ship(2, None), ship(3, Some("0"))];
    let incomes = vec![
        income(1, 1, "1000", day(2024, 2, 5)),
        income(2, 2, "2000", day(2024, 2, 5)),
        income(3, 3, "3000", day(2024, 2, 5)),
    ];
    let expenses = vec![expense(1, 3, "500", day(2024, 2, 6))];
    let report = calculate_profit_for_all_ships(&ships, &incomes, &expenses, feb_2024());

    let ok: Vec<i64> = report.succeeded().map(|p| p.ship_id).collect();
    assert_eq!(ok, vec![1, 3]);
    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed, vec![(2, &ShipFailure::MissingPurchaseCost(2))]);
    assert!(!report.is_complete());

    let third = report.results[&3].as_ref().unwrap();
    assert_eq!(third.net_profit, d("2500"));
}

#[test]
fn batch_skips_inactive_ships() {
    let mut retired = ship(9, Some("100"));
    retired.is_active = false;
    let report = calculate_profit_for_all_ships(&[retired], &[], &[], feb_2024());
    assert!(report.results.is_empty());
    assert!(report.is_complete());
}

#[test]
fn stored_profits_match_client_totals() {
    let ships = vec![ship(1, Some("1000")), ship(2, Some("2000"))];
    let incomes = boundary_incomes();
    let expenses = vec![
        expense(1, 1, "80", day(2024, 2, 14)),
        expense(2, 2, "100", day(2024, 2, 28)),
    ];
    let report = calculate_profit_for_all_ships(&ships, &incomes, &expenses, feb_2024());
    let stored: Vec<MonthlyProfit> = report.succeeded().cloned().collect();
    assert!(reconcile_profits(&stored, &incomes, &expenses).is_empty());

    for p in &stored {
        let t = monthly_totals(p.ship_id, &incomes, &expenses, p.month);
        assert_eq!(p.total_income, t.total_income);
        assert_eq!(p.total_expenses, t.total_expenses);
        assert_eq!(p.net_profit, t.net_profit);
    }
}

#[test]
fn reconcile_flags_drifted_fields() {
    let incomes = vec![income(1, 1, "100", day(2024, 2, 1))];
    let stored = vec![MonthlyProfit {
        ship_id: 1,
        month: feb_2024(),
        total_income: d("100"),
        total_expenses: d("0"),
        net_profit: d("90"),
    }];
    let mismatches = reconcile_profits(&stored, &incomes, &[]);
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].field, "net_profit");
    assert_eq!(mismatches[0].computed, d("100"));
}
