//! Admin routes — operator actions behind the admin bearer token.

use axum::{extract::State, middleware, routing::post, Json, Router};
use ownbot_common::error::OwnBotResult;
use ownbot_db::repository::subscriptions;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Serialize)]
struct CheckSubscriptionsResponse {
    message: String,
    expired_count: u64,
    warned_count: u64,
}

/// Admin router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/check-subscriptions", post(check_subscriptions))
        .route_layer(middleware::from_fn(crate::middleware::admin_auth))
}

/// POST /api/admin/check-subscriptions
///
/// Manually triggers the subscription sweep and relays its counts.
async fn check_subscriptions(
    State(state): State<Arc<AppState>>,
) -> OwnBotResult<Json<CheckSubscriptionsResponse>> {
    let warn_window_days = ownbot_common::config::get().subscriptions.warn_window_days;
    let report = subscriptions::run_check(&state.db.pg, warn_window_days).await?;

    tracing::info!(
        expired_count = report.expired_count,
        warned_count = report.warned_count,
        "Manual subscription check completed"
    );

    Ok(Json(CheckSubscriptionsResponse {
        message: "Subscription check completed".into(),
        expired_count: report.expired_count,
        warned_count: report.warned_count,
    }))
}
