//! Hearth CLI
//!
//! Usage:
//!   hearth init
//!   hearth household add "Home"
//!   hearth account add --household 1 "Checking"
//!   hearth import statement.csv --household 1 --account 1 [--profile p.toml] [--rules r.toml]
//!   hearth suggest --household 1 [--json]
//!   hearth accept --household 1 --name Netflix --type expense

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    // RUST_LOG, then --verbose, then the configured filter
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    commands::run(cli.command, &settings).await
}
