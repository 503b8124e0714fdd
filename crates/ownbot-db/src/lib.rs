//! # ownbot-db
//!
//! Database layer for OwnBot. One PostgreSQL pool holds everything:
//! clients, subscriptions, documents + chunks, phone numbers, chat
//! sessions and messages. Schema is created on startup via migrations.

pub mod repository;

use anyhow::Result;
use sqlx::PgPool;

/// Shared database state passed through Axum extractors.
#[derive(Clone)]
pub struct Database {
    pub pg: PgPool,
}

impl Database {
    /// Connect to PostgreSQL.
    pub async fn connect(config: &ownbot_common::config::AppConfig) -> Result<Self> {
        tracing::info!("Connecting to PostgreSQL...");
        let pg = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect(&config.database.url)
            .await?;

        tracing::info!("Connected to PostgreSQL");

        Ok(Self { pg })
    }

    /// Run database migrations — creates all tables on first boot.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pg).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Readiness probe — a trivial round-trip to Postgres.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pg).await.is_ok()
    }
}
