//! # OwnBot Server
//!
//! Composition root: loads configuration, initializes logging, ensures the
//! database schema exists, wires the HTTP routers, and serves until a
//! shutdown signal arrives.

use ownbot_api::{build_router, completion::CompletionClient, AppState};
use ownbot_db::Database;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ownbot_common::config::init()?;

    // Initialize tracing (structured logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ownbot=debug,tower_http=debug".into()),
        )
        .with_target(true)
        .init();

    tracing::info!("Starting OwnBot v{}", env!("CARGO_PKG_VERSION"));

    // Connect to the database and create tables on startup
    let db = Database::connect(config).await?;
    db.migrate().await?;
    tracing::info!("Database tables created successfully");

    // Hosted completion model (optional — retrieval-only without it)
    let completion = CompletionClient::from_config(&config.chat);
    if completion.is_enabled() {
        tracing::info!("Completion model configured at {}", config.chat.model_url);
    } else {
        tracing::info!("No completion model configured, chat replies use retrieval only");
    }

    // Routers are registered before the listener starts accepting
    let state = AppState { db, completion };
    let app = build_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("OwnBot API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Application shutting down");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
