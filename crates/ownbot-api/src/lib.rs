//! # ownbot-api
//!
//! REST API layer for OwnBot. Provides HTTP endpoints for tenant management,
//! the document knowledge base, subscriptions, phone numbers, and the chat
//! widget, plus the liveness/readiness/info surface.

pub mod auth;
pub mod completion;
pub mod middleware;
pub mod routes;

use axum::response::{IntoResponse, Response};
use axum::Router;
use completion::CompletionClient;
use ownbot_db::Database;
use std::sync::Arc;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Hosted completion model client — disabled falls back to
    /// retrieval-only replies.
    pub completion: CompletionClient,
}

/// Build the complete API router with all routes and middleware.
///
/// Routers are wired before the server begins accepting connections; the
/// caller binds the listener only after this returns.
pub fn build_router(state: AppState) -> Router {
    let config = ownbot_common::config::get();
    let shared = Arc::new(state);

    Router::new()
        .merge(routes::meta::router())
        .nest("/api/clients", routes::clients::router())
        .nest("/api/documents", routes::documents::router())
        .nest("/api/subscriptions", routes::subscriptions::router())
        .nest("/api/numbers", routes::numbers::router())
        .nest("/api/chat", routes::chat::router(shared.clone()))
        .nest("/api/admin", routes::admin::router())
        // Chat widget assets
        .nest_service(
            "/static",
            tower_http::services::ServeDir::new(&config.server.static_dir),
        )
        // Development posture: the dashboard may live anywhere
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // Last line of defense: a panicking handler still yields the
        // uniform error envelope instead of a dropped connection.
        .layer(tower_http::catch_panic::CatchPanicLayer::custom(handle_panic))
        .with_state(shared)
}

/// Convert an escaped panic into the standard 500 envelope.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Unhandled panic in request handler: {detail}");

    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({
            "code": 500,
            "error": "INTERNAL_ERROR",
            "message": "Internal server error",
        })),
    )
        .into_response()
}
