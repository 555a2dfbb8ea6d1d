//! rhyzome: microblog graph store server.
//!
//! Reads config from flags or env vars:
//!   RHYZOME_DB             SQLite file or `:memory:` (default: rhyzome.db)
//!   RHYZOME_BIND_ADDR      listen address (default: 127.0.0.1:8080)
//!   RHYZOME_ADMIN_PASSWORD password for `POST /tokens` (required)
//!
//! Tokens are kept in memory only and do not survive a restart.

use anyhow::Context;
use clap::Parser;
use rhyzome_core::Store;
use rhyzome_server::{build_router, AppState, ServerArgs};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rhyzome_server=debug,tower_http=debug".into()),
        )
        .init();

    let args = ServerArgs::parse();
    args.validate()?;

    let store = Store::open(&args.db)
        .with_context(|| format!("failed to open store at {}", args.db.display()))?;
    tracing::info!(db = %args.db.display(), "store ready");

    let app = build_router(AppState::new(store.clone(), args.admin_password));

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind to {}", args.bind))?;
    tracing::info!("rhyzome listening on {}", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Closes the connection if no request task still holds a clone.
    store.close().context("failed to close store")?;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
