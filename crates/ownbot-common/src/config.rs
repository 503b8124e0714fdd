//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global application configuration.
///
/// # Panics
/// Panics if config has not been initialized via [`init`].
pub fn get() -> &'static AppConfig {
    CONFIG.get().expect("Config not initialized. Call ownbot_common::config::init() first.")
}

/// Initialize the global configuration from environment.
///
/// Should be called once at application startup, before any other code accesses config.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cfg = config::Config::builder()
        // Defaults
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.static_dir", "./static")?
        .set_default("database.max_connections", 20)?
        .set_default("database.min_connections", 5)?
        .set_default("auth.admin_token", "")?
        .set_default("chat.model_url", "")?
        .set_default("chat.model_api_key", "")?
        .set_default("chat.request_timeout_secs", 20)?
        .set_default("subscriptions.warn_window_days", 7)?
        .set_default("limits.max_document_bytes", 10_485_760)? // 10MB
        .set_default("limits.max_chunk_chars", 1200)?
        .set_default("limits.retrieval_top_k", 4)?
        .set_default("limits.max_message_length", 2000)?
        .set_default("limits.max_documents_per_client", 100)?
        .set_default("limits.max_numbers_per_client", 10)?
        // Optional config file
        .add_source(config::File::with_name("config").required(false))
        // Environment variables (OWNBOT_SERVER__HOST, OWNBOT_DATABASE__URL, etc.)
        .add_source(
            config::Environment::with_prefix("OWNBOT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = cfg.try_deserialize()?;
    Ok(CONFIG.get_or_init(|| app_config))
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub chat: ChatConfig,
    pub subscriptions: SubscriptionsConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static` (chat widget assets).
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Bearer token required by `/api/admin` endpoints.
    /// Empty (the default) means admin endpoints reject every request.
    pub admin_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Hosted completion endpoint (e.g. an inference API URL).
    /// Empty disables the model — replies fall back to retrieval only.
    pub model_url: String,
    /// Bearer key for the completion endpoint.
    pub model_api_key: String,
    /// Upstream request timeout in seconds.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubscriptionsConfig {
    /// Subscriptions expiring within this many days get a warning mark.
    pub warn_window_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    pub max_document_bytes: usize,
    /// Upper bound on characters per knowledge chunk.
    pub max_chunk_chars: usize,
    /// Chunks retrieved per chat message.
    pub retrieval_top_k: i64,
    pub max_message_length: usize,
    pub max_documents_per_client: i64,
    pub max_numbers_per_client: i64,
}
