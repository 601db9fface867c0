use anyhow::Context;
use tracing::info;

mod api;
mod config;
mod error;
mod probe;
mod server;

use config::{Config, LogFormat, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // When invoked as a Docker HEALTHCHECK, probe /health and exit immediately.
    // A failed probe returns Err, so the process exits non-zero.
    if std::env::args().nth(1).as_deref() == Some("--healthcheck") {
        return healthcheck().await;
    }

    let (config, source) = Config::resolve()?;

    init_tracing(&config.logging);

    let addr = config.server.socket_addr()?;
    info!(
        %source,
        %addr,
        request_timeout_ms = config.server.request_timeout_ms,
        "backend starting"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    let app = api::router(&config.server);
    server::serve(listener, app, server::shutdown_signal()).await?;

    info!("backend stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        tracing_subscriber::EnvFilter::new(logging.filter(std::env::var("RUST_LOG").ok()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Lightweight healthcheck: GET /health and exit 0 on `{"status": "ok"}`.
/// Invoked via `backend --healthcheck` from Docker HEALTHCHECK.
async fn healthcheck() -> anyhow::Result<()> {
    let (config, _) = Config::resolve()?;
    let url = config.server.probe_url()?;
    probe::probe(&url, probe::PROBE_TIMEOUT).await
}
