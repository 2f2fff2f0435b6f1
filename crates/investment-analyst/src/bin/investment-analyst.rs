//! AI investment analyst web server
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin investment-analyst -- --bind 127.0.0.1:8501
//! ```
//!
//! Then open the printed address. Provider, model and API key are entered
//! on the page; nothing is read from the environment except `RUST_LOG`.

use analyst_market::YahooQuoteSource;
use anyhow::{Context, Result};
use clap::Parser;
use investment_analyst::config::Cli;
use investment_analyst::logging::init_tracing;
use investment_analyst::web::{self, AppState, Pages};
use investment_analyst::{LiveAgentBackend, ReportRequestBuilder};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let settings = cli.agent_settings();
    let backend = LiveAgentBackend::new(settings, Arc::new(YahooQuoteSource::new()));
    let pages = Pages::new().context("failed to compile page templates")?;
    let app = web::router(AppState::new(ReportRequestBuilder::new(Arc::new(backend)), pages));

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(
        address = %cli.bind,
        max_iterations = settings.max_iterations,
        "investment-analyst listening on http://{}",
        cli.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
