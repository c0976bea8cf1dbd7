// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use shipledger::ingest::{
    decimal, expense, income, many, non_negative, partner, profit, ship, snapshot_from_json,
    split_page,
};
use shipledger::models::YearMonth;

fn d(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

#[test]
fn decimals_accept_numbers_strings_and_separators() {
    assert_eq!(decimal(Some(&json!(1500))), Some(d("1500")));
    assert_eq!(decimal(Some(&json!("12.50"))), Some(d("12.50")));
    assert_eq!(decimal(Some(&json!("1,250,000.75"))), Some(d("1250000.75")));
    assert_eq!(decimal(Some(&json!(""))), None);
    assert_eq!(decimal(Some(&json!("n/a"))), None);
    assert_eq!(decimal(Some(&json!(null))), None);
    assert_eq!(decimal(None), None);
}

#[test]
fn non_negative_coerces_garbage_to_zero() {
    assert_eq!(non_negative(Some(&json!("-40"))), Decimal::ZERO);
    assert_eq!(non_negative(Some(&json!("abc"))), Decimal::ZERO);
    assert_eq!(non_negative(None), Decimal::ZERO);
    assert_eq!(non_negative(Some(&json!("99.9"))), d("99.9"));
}

#[test]
fn split_page_reads_bare_arrays_and_paginated_pages() {
    let (items, next) = split_page(json!([{"id": 1}, {"id": 2}]), "ships/").unwrap();
    assert_eq!(items.len(), 2);
    assert!(next.is_none());

    let page = json!({
        "count": 3,
        "next": "https://api.example.com/ships/?page=2",
        "previous": null,
        "results": [{"id": 1}]
    });
    let (items, next) = split_page(page, "ships/").unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(next.as_deref(), Some("https://api.example.com/ships/?page=2"));

    assert!(split_page(json!("oops"), "ships/").is_err());
}

#[test]
fn ship_without_cost_keeps_cost_missing() {
    let s = ship(&json!({"id": 4, "name": "Sea Hawk", "purchase_cost": null})).unwrap();
    assert_eq!(s.purchase_cost, None);
    assert!(s.is_active);

    let s = ship(&json!({"id": 5, "name": "Gull", "purchase_cost": "-10"})).unwrap();
    assert_eq!(s.purchase_cost, Some(Decimal::ZERO));

    let s = ship(&json!({"id": "6", "name": "Tern", "purchase_cost": "2,000,000", "is_active": false}))
        .unwrap();
    assert_eq!(s.id, 6);
    assert_eq!(s.purchase_cost, Some(d("2000000")));
    assert!(!s.is_active);
}

#[test]
fn records_without_ids_or_ship_refs_are_dropped() {
    let values = vec![
        json!({"id": 1, "ship": 2, "amount": "100", "date": "2024-02-01"}),
        json!({"ship": 2, "amount": "50", "date": "2024-02-02"}),
        json!({"id": 3, "amount": "75", "date": "2024-02-03"}),
        json!("not a record"),
    ];
    let incomes = many(&values, income);
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].id, 1);
}

#[test]
fn dates_accept_plain_and_timestamped_forms() {
    let feb1 = NaiveDate::from_ymd_opt(2024, 2, 1);
    let a = income(&json!({"id": 1, "ship": 1, "amount": 1, "date": "2024-02-01"})).unwrap();
    let b = income(&json!({"id": 2, "ship": 1, "amount": 1, "date": "2024-02-01T10:30:00Z"}))
        .unwrap();
    let c = expense(&json!({"id": 3, "ship": 1, "amount": 1, "date": "2024-02-01T23:59:59.5"}))
        .unwrap();
    let e = expense(&json!({"id": 4, "ship": 1, "amount": 1, "date": "yesterday"})).unwrap();
    assert_eq!(a.date, feb1);
    assert_eq!(b.date, feb1);
    assert_eq!(c.date, feb1);
    assert_eq!(e.date, None);
}

#[test]
fn nested_ship_objects_resolve_to_ids() {
    let p = partner(&json!({
        "id": 10,
        "ship": {"id": 7, "name": "Albatross"},
        "name": "Rahim",
        "share_percentage": "12.5"
    }))
    .unwrap();
    assert_eq!(p.ship_id, 7);
    assert_eq!(p.share_percentage, d("12.5"));
    assert!(p.is_active);
}

#[test]
fn profit_months_accept_first_of_month_dates() {
    let p = profit(&json!({
        "id": 99,
        "ship": 1,
        "month": "2024-02-01",
        "total_income": "1000.00",
        "total_expenses": "250.00",
        "net_profit": "750.00"
    }))
    .unwrap();
    assert_eq!(p.month, YearMonth::new(2024, 2).unwrap());
    assert_eq!(p.net_profit, d("750"));

    assert!(profit(&json!({"ship": 1, "month": "soon"})).is_none());
}

#[test]
fn snapshot_reads_every_record_kind() {
    let snap = snapshot_from_json(json!({
        "ships": [{"id": 1, "name": "Sea Hawk", "purchase_cost": "1000000"}],
        "partners": {"next": null, "results": [
            {"id": 1, "ship": 1, "name": "Karim", "share_percentage": 10}
        ]},
        "projects": [{"id": 1, "ship": 1, "name": "Dredging", "daily_rate": "5000", "start_date": "2024-01-15"}],
        "incomes": [{"id": 1, "ship": 1, "amount": "50000", "date": "2024-02-10"}],
        "expenses": []
    }))
    .unwrap();
    assert_eq!(snap.ships.len(), 1);
    assert_eq!(snap.partners.len(), 1);
    assert_eq!(snap.projects.len(), 1);
    assert_eq!(snap.incomes.len(), 1);
    assert!(snap.expenses.is_empty());
    assert!(snap.profits.is_empty());

    assert!(snapshot_from_json(json!([1, 2, 3])).is_err());
}
