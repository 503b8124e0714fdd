//! Meta endpoints — liveness, readiness, and the capability descriptor.
//!
//! `GET /` reports the process is up without touching dependencies;
//! `GET /health` probes the database and flips to 503 when it is away;
//! `GET /api/info` is the static descriptor the dashboard renders.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use ownbot_common::models::chat::ChatChannel;
use ownbot_common::models::client::BusinessType;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Serialize)]
struct LivenessResponse {
    message: String,
    status: String,
    timestamp: String,
    version: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    timestamp: String,
}

/// Meta router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/info", get(app_info))
}

/// GET / — liveness. No dependency checks.
async fn root() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: "OwnBot API is running".into(),
        status: "success".into(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// GET /health — readiness. 503 whenever the storage probe fails.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_ok = state.db.ping().await;

    let (status, health, database) = if db_ok {
        (StatusCode::OK, "healthy", "connected")
    } else {
        tracing::error!("Health check failed: database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "unreachable")
    };

    (
        status,
        Json(HealthResponse {
            status: health.into(),
            database: database.into(),
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

/// GET /api/info — static capability descriptor.
async fn app_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app_name": "OwnBot",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AI-powered chatbot management platform",
        "features": [
            "Multi-tenant client management",
            "Document-based knowledge system",
            "WhatsApp, Voice, and Web chat integration",
            "Subscription-based billing",
            "Phone number management",
        ],
        "supported_channels": ChatChannel::ALL,
        "supported_business_types": BusinessType::ALL,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    // root and app_info take no state, so they can be exercised through a
    // bare router without a database.
    fn stateless_router() -> Router {
        Router::new()
            .route("/", get(root))
            .route("/api/info", get(app_info))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn liveness_always_succeeds_with_timestamp() {
        let (status, body) = get_json(stateless_router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "OwnBot API is running");
        assert!(!body["timestamp"].as_str().unwrap().is_empty());
        assert!(!body["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn info_lists_channels_and_verticals() {
        let (status, body) = get_json(stateless_router(), "/api/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["app_name"], "OwnBot");
        assert_eq!(
            body["supported_channels"],
            serde_json::json!(["whatsapp", "voice", "web"])
        );
        let verticals = body["supported_business_types"].as_array().unwrap();
        assert!(verticals.contains(&serde_json::json!("restaurant")));
        assert!(verticals.contains(&serde_json::json!("other")));
        assert!(!body["features"].as_array().unwrap().is_empty());
    }
}
