use anyhow::Context;
use clap::Parser;
use std::net::IpAddr;
use tokio::net::TcpListener;
use tracing::info;

use investoros_server::{logging, router, ServerConfig};

/// HTTP service for rental property underwriting
#[derive(Parser)]
#[command(name = "investoros-server", version)]
struct Args {
    /// Bind address (overrides INVESTOROS_HOST)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Bind port (overrides INVESTOROS_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("invalid server configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    logging::init_logging(config.log_json);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, cors = ?config.cors_origins, "underwriting service listening");

    axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("underwriting service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
