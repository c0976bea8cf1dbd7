// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use shipledger::{cli, commands::exporter, config::AppConfig, db};
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO ships(id, name, purchase_cost) VALUES (1, 'Sea Hawk', '1000000');
        INSERT INTO partners(ship_id, name, share_percentage) VALUES (1, 'Karim', '10');
        INSERT INTO incomes(ship_id, amount, date) VALUES (1, '60000', '2024-02-03');
        INSERT INTO expenses(ship_id, amount, date) VALUES (1, '10000', '2024-02-20');
        INSERT INTO monthly_profits(ship_id, month, total_income, total_expenses, net_profit)
            VALUES (1, '2024-01', '30000', '5000', '25000'),
                   (1, '2024-02', '60000', '10000', '50000');
        "#,
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["shipledger", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m, &AppConfig::default())
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_slips_writes_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("slips.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &conn,
        &["slips", "--month", "2024-02", "--format", "json", "--out", &out_str],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "month": "2024-02",
                "ship": "Sea Hawk",
                "purchase_cost": "1000000.00",
                "partner": "Karim",
                "share_amount": "100000.00",
                "net_profit": "50000.00",
                "benefit_per_lakh": "5000.00",
                "payable": "5000.00"
            }
        ])
    );
}

#[test]
fn export_profits_writes_csv_with_trend() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("profits.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, &["profits", "--format", "csv", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "2024-01");
    assert_eq!(&rows[0][6], "");
    assert_eq!(&rows[1][1], "Sea Hawk");
    assert_eq!(&rows[1][5], "50000.00");
    assert_eq!(&rows[1][6], "25000.00");
    assert_eq!(&rows[1][7], "100.0");
}

#[test]
fn export_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("slips.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let res = run_export(
        &conn,
        &["slips", "--month", "2024-02", "--format", "xml", "--out", &out_str],
    );
    assert!(res.is_err());
    assert!(!out_path.exists());
}
