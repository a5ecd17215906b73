//! `agentauth` — foreground entrypoint for the credential-gating reverse
//! proxy a sandboxed agent fleet member talks to on its loopback/bridge
//! interface. No daemon mode, no OAuth CLI, no config file: the swarm
//! launcher starts this process once per sandbox and owns its lifecycle.

use agentauth_allowlist::Allowlist;
use agentauth_config::Config;
use agentauth_proxy::AppState;
use agentauth_secrets::KeystoreAdapter;
use anyhow::{Context as _, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// How long `axum::serve`'s graceful shutdown waits for in-flight requests
/// (including open SSE streams) to finish after a shutdown signal arrives.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "agentauth", about = "credential-gating reverse proxy")]
struct Cli {
    /// Override the listening port (default: $AGENTAUTH_PORT, else 9999).
    #[arg(short, long)]
    port: Option<u16>,
    /// Override the listening address (default: $AGENTAUTH_BIND, else 0.0.0.0).
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("reading configuration from environment")?;
    let port = cli.port.unwrap_or(config.port);
    let bind = cli.bind.unwrap_or(config.bind);

    let allowlist = Allowlist::default();
    let secrets = Arc::new(KeystoreAdapter::new());
    let state = AppState::new(allowlist, secrets, port);
    let app = agentauth_proxy::make_router(state);

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    let backends: Vec<&'static str> = agentauth_registry::provider_ids()
        .into_iter()
        .map(agentauth_types::ProviderId::as_str)
        .collect();
    tracing::info!(
        addr = %addr,
        backends = %backends.join(","),
        "agentauth listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    Ok(())
}

/// Resolves on Ctrl-C, starting `axum::serve`'s graceful drain of in-flight
/// requests (including open SSE streams). A watchdog races the drain: if it
/// hasn't finished within [`SHUTDOWN_GRACE`], the process exits immediately
/// rather than let a stuck upstream connection hang the sandbox teardown.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!(grace_seconds = SHUTDOWN_GRACE.as_secs(), "shutting down");
    tokio::spawn(async {
        tokio::time::sleep(SHUTDOWN_GRACE).await;
        tracing::warn!("grace period elapsed with requests still draining, forcing exit");
        std::process::exit(1);
    });
}
