// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shipledger::engine::{
    IntegrityWarning, average_daily_income, daily_income_series, dashboard_summary, day_income,
    integrity_warnings, partner_slips, partner_statements, profit_history,
};
use shipledger::models::{DailyIncome, Expense, MonthlyProfit, Partner, Ship, Snapshot, YearMonth};

fn d(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn day(y: i32, m: u32, dd: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, dd).unwrap()
}

fn month(y: i32, m: u32) -> YearMonth {
    YearMonth::new(y, m).unwrap()
}

fn ship(id: i64, name: &str, cost: Option<&str>) -> Ship {
    Ship {
        id,
        name: name.into(),
        purchase_cost: cost.map(d),
        purchase_date: None,
        is_active: true,
    }
}

fn partner(id: i64, ship_id: i64, name: &str, share: &str, active: bool) -> Partner {
    Partner {
        id,
        ship_id,
        name: name.into(),
        share_percentage: d(share),
        email: None,
        phone: None,
        is_active: active,
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

fn profit(ship_id: i64, m: YearMonth, net: &str) -> MonthlyProfit {
    MonthlyProfit {
        ship_id,
        month: m,
        total_income: d(net),
        total_expenses: Decimal::ZERO,
        net_profit: d(net),
    }
}

fn fleet() -> Snapshot {
    Snapshot {
        ships: vec![
            ship(1, "Sea Hawk", Some("1000000")),
            ship(2, "Gull", Some("500000")),
        ],
        incomes: vec![
            income(1, 1, "100", Some(day(2024, 2, 1))),
            income(2, 2, "50", Some(day(2024, 2, 1))),
            income(3, 1, "300", Some(day(2024, 2, 10))),
            income(4, 1, "200", Some(day(2024, 1, 20))),
        ],
        expenses: vec![expense(1, 1, "80", Some(day(2024, 2, 5)))],
        ..Default::default()
    }
}

#[test]
fn day_income_filters_by_date_and_ship() {
    let snap = fleet();
    assert_eq!(day_income(&snap.incomes, day(2024, 2, 1), None), d("150"));
    assert_eq!(day_income(&snap.incomes, day(2024, 2, 1), Some(2)), d("50"));
    assert_eq!(day_income(&snap.incomes, day(2024, 2, 2), None), Decimal::ZERO);
}

#[test]
fn average_divides_by_income_records() {
    let snap = fleet();
    assert_eq!(average_daily_income(&snap.incomes, month(2024, 2), None), d("150"));
    assert_eq!(average_daily_income(&snap.incomes, month(2024, 2), Some(1)), d("200"));
    assert_eq!(average_daily_income(&snap.incomes, month(2024, 3), None), Decimal::ZERO);

    // Two records on the same day still count twice.
    let same_day = vec![
        income(1, 1, "100", Some(day(2024, 2, 5))),
        income(2, 2, "200", Some(day(2024, 2, 5))),
    ];
    assert_eq!(average_daily_income(&same_day, month(2024, 2), None), d("150"));
}

#[test]
fn dashboard_compares_against_previous_month() {
    let snap = fleet();
    let s = dashboard_summary(&snap, day(2024, 2, 10));
    assert_eq!(s.month, month(2024, 2));
    assert_eq!(s.day_income, d("300"));
    assert_eq!(s.average_daily_income, d("150"));
    assert_eq!(s.day_trend.delta, d("150"));
    assert_eq!(s.day_trend.percent, d("100"));
    assert_eq!(s.month_income, d("450"));
    assert_eq!(s.month_expenses, d("80"));
    assert_eq!(s.month_net, d("370"));

    let hawk = s.ships.iter().find(|c| c.ship_id == 1).unwrap();
    assert_eq!(hawk.this_month_income, d("400"));
    assert_eq!(hawk.last_month_income, d("200"));
    assert_eq!(hawk.trend.percent, d("100"));

    let gull = s.ships.iter().find(|c| c.ship_id == 2).unwrap();
    assert_eq!(gull.last_month_income, Decimal::ZERO);
    assert_eq!(gull.trend.percent, Decimal::ZERO);
}

#[test]
fn daily_series_is_zero_filled() {
    let snap = fleet();
    let series = daily_income_series(&snap.ships, &snap.incomes, month(2024, 2));
    assert_eq!(series.len(), 2);
    let hawk = &series[0];
    assert_eq!(hawk.points.len(), 29);
    assert_eq!(hawk.points[0], (day(2024, 2, 1), d("100")));
    assert_eq!(hawk.points[9], (day(2024, 2, 10), d("300")));
    assert_eq!(hawk.points[1].1, Decimal::ZERO);
    let total: Decimal = hawk.points.iter().map(|(_, v)| *v).sum();
    assert_eq!(total, d("400"));
}

#[test]
fn history_trend_uses_same_ship_previous_month() {
    let profits = vec![
        profit(2, month(2024, 2), "500"),
        profit(1, month(2024, 2), "1500"),
        profit(1, month(2024, 1), "1000"),
        profit(1, month(2024, 4), "200"),
    ];
    let rows = profit_history(&profits);
    let keys: Vec<(i64, String)> = rows
        .iter()
        .map(|r| (r.profit.ship_id, r.profit.month.to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (1, "2024-01".to_string()),
            (1, "2024-02".to_string()),
            (1, "2024-04".to_string()),
            (2, "2024-02".to_string()),
        ]
    );
    assert!(rows[0].trend.is_none());
    let feb = rows[1].trend.unwrap();
    assert_eq!(feb.delta, d("500"));
    assert_eq!(feb.percent, d("50"));
    assert!(rows[2].trend.is_none());
    assert!(rows[3].trend.is_none());
}

#[test]
fn statements_cover_active_partners_and_flag_orphans() {
    let mut snap = fleet();
    snap.incomes = vec![income(1, 1, "50000", Some(day(2024, 2, 14)))];
    snap.expenses.clear();
    snap.partners = vec![
        partner(1, 1, "Karim", "10", true),
        partner(2, 1, "Rahim", "20", false),
        partner(3, 99, "Ghost", "5", true),
    ];

    let report = partner_statements(&snap, month(2024, 2));
    assert_eq!(report.ships.len(), 1);
    let st = &report.ships[0];
    assert_eq!(st.ship_id, 1);
    assert_eq!(st.totals.net_profit, d("50000"));
    assert_eq!(st.benefit_per_unit, d("5000"));
    assert_eq!(st.partners.len(), 1);
    assert_eq!(st.partners[0].share_amount, d("100000"));
    assert_eq!(st.partners[0].payable, d("5000"));
    assert_eq!(st.total_payable, d("5000"));
    assert_eq!(
        report.warnings,
        vec![IntegrityWarning::OrphanPartner {
            partner_id: 3,
            ship_id: 99
        }]
    );

    let slips = partner_slips(&report);
    assert_eq!(slips.len(), 1);
    assert_eq!(slips[0].partner_name, "Karim");
    assert_eq!(slips[0].ship_name, "Sea Hawk");
    assert_eq!(slips[0].purchase_cost, d("1000000"));
    assert_eq!(slips[0].payable, d("5000"));
}

#[test]
fn integrity_checks_report_each_problem() {
    let mut snap = fleet();
    snap.ships.push(ship(3, "Tern", None));
    snap.partners = vec![
        partner(1, 2, "A", "60", true),
        partner(2, 2, "B", "50", true),
    ];
    snap.incomes.push(income(9, 1, "10", None));
    snap.expenses.push(expense(7, 42, "5", Some(day(2024, 2, 2))));
    snap.profits = vec![profit(1, month(2024, 2), "1")];

    let warnings = integrity_warnings(&snap);
    assert!(warnings.contains(&IntegrityWarning::MissingPurchaseCost { ship_id: 3 }));
    assert!(warnings.contains(&IntegrityWarning::ShareOverflow {
        ship_id: 2,
        total: d("110")
    }));
    assert!(warnings.contains(&IntegrityWarning::UndatedIncome { income_id: 9 }));
    assert!(warnings.contains(&IntegrityWarning::OrphanExpense {
        expense_id: 7,
        ship_id: 42
    }));
    assert!(
        warnings
            .iter()
            .any(|w| matches!(w, IntegrityWarning::ProfitMismatch(m) if m.ship_id == 1))
    );

    let tagged = serde_json::to_value(IntegrityWarning::MissingPurchaseCost { ship_id: 3 }).unwrap();
    assert_eq!(tagged["kind"], "missing_purchase_cost");
}

#[test]
fn clean_fleet_has_no_warnings() {
    assert!(integrity_warnings(&fleet()).is_empty());
}
