// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use shipledger::{cli, commands, config::AppConfig, db};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = AppConfig::from_env()?;
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init(&cfg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&cfg)?.display());
        }
        Some(("ship", sub)) => commands::ships::handle(&conn, sub)?,
        Some(("partner", sub)) => commands::partners::handle(&conn, sub)?,
        Some(("project", sub)) => commands::projects::handle(&conn, sub)?,
        Some(("income", sub)) => commands::incomes::handle(&conn, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&conn, sub)?,
        Some(("profit", sub)) => commands::profits::handle(&conn, sub, &cfg)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub, &cfg)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub, &cfg)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&mut conn, sub, &cfg)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, sub, &cfg)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub, &cfg)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
