mod config;
mod gui;
mod network;
mod presenter;
mod topology;

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::AppConfig;
use gui::app;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(?config, "Starting ConnectFlow");

    if let Err(e) = app::main(config) {
        tracing::error!("{}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
