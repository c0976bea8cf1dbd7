// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use shipledger::api::ApiClient;
use shipledger::config::AppConfig;
use shipledger::error::LedgerError;
use shipledger::models::YearMonth;
use shipledger::source::RecordSource;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

/// Answers one connection per body, in order, and returns the request lines it saw.
/// `bodies` receives the server's base URL so pages can link to each other.
fn serve(bodies: impl FnOnce(&str) -> Vec<String>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());
    let bodies = bodies(&base);
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for body in bodies {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 8192];
            let n = stream.read(&mut buf).unwrap();
            let req = String::from_utf8_lossy(&buf[..n]).to_string();
            seen.push(req.lines().next().unwrap_or_default().to_string());
            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(resp.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        seen
    });
    (base, handle)
}

/// A base URL nothing listens on.
fn closed_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

#[test]
fn listing_follows_next_links() {
    let (base, handle) = serve(|base| {
        vec![
            format!(
                r#"{{"count": 3, "next": "{}ships/?page=2", "previous": null,
                    "results": [{{"id": 1, "name": "Alpha", "purchase_cost": "1000000"}},
                                {{"id": 2, "name": "Beta", "purchase_cost": null}}]}}"#,
                base
            ),
            r#"{"count": 3, "next": null, "results": [{"id": 3, "name": "Gamma"}]}"#.to_string(),
        ]
    });
    let client = ApiClient::new(&base, Duration::from_secs(5)).unwrap();
    let ships = client.fetch_ships().unwrap();
    let ids: Vec<i64> = ships.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(ships[1].purchase_cost, None);

    let seen = handle.join().unwrap();
    assert_eq!(
        seen,
        vec![
            "GET /ships/ HTTP/1.1".to_string(),
            "GET /ships/?page=2 HTTP/1.1".to_string(),
        ]
    );
}

#[test]
fn bare_array_listing_needs_one_request() {
    let (base, handle) = serve(|_| {
        vec![r#"[{"id": 5, "ship": 1, "amount": "250.50", "date": "2024-02-10"}]"#.to_string()]
    });
    let client = ApiClient::new(&base, Duration::from_secs(5)).unwrap();
    let incomes = client.fetch_incomes().unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].id, 5);
    assert_eq!(handle.join().unwrap().len(), 1);
}

#[test]
fn submit_all_reports_every_ship_when_backend_is_down() {
    let client = ApiClient::new(&closed_base(), Duration::from_millis(500)).unwrap();
    let month = YearMonth::new(2024, 2).unwrap();
    let results = client.submit_all(&[1, 2, 3], month);
    assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(results.values().all(|r| r.is_err()));
}

#[test]
fn listing_error_surfaces_when_backend_is_down() {
    let client = ApiClient::new(&closed_base(), Duration::from_millis(500)).unwrap();
    assert!(matches!(client.get_list("ships/"), Err(LedgerError::Http(_))));
}

#[test]
fn client_requires_a_base_url() {
    assert!(matches!(
        ApiClient::from_config(&AppConfig::default()),
        Err(LedgerError::Config(_))
    ));

    let cfg = AppConfig {
        api_base_url: Some("https://ships.example.com/api".into()),
        timeout: Duration::from_secs(1),
        db_path: None,
    };
    let client = ApiClient::from_config(&cfg).unwrap();
    assert_eq!(
        client.url("/profits/calculate_profit/"),
        "https://ships.example.com/api/profits/calculate_profit/"
    );
}
