//! Command-line console for the hosted Redis platform.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod console_config;
mod console_services;

use clap::Parser;
use paas_core::AppError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::console_config::{ConsoleConfig, init_tracing};
use crate::console_services::ConsoleServices;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ConsoleConfig::load()?;
    info!(
        api_url = %config.api_url,
        state_path = %config.state_path.display(),
        timeout_secs = config.http_timeout.as_secs(),
        "paas-console started"
    );

    let services = ConsoleServices::build(&config)?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling request");
            interrupt.cancel();
        }
    });

    let output = commands::run(&services, cli.command, &cancel).await?;
    println!("{output}");

    Ok(())
}
