//! Subscription routes — plan lifecycle for clients.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use ownbot_common::{
    error::{OwnBotError, OwnBotResult},
    ids,
    models::subscription::{
        CreateSubscriptionRequest, RenewSubscriptionRequest, Subscription, SubscriptionStatus,
    },
    validation::validate_request,
};
use ownbot_db::repository::{clients, subscriptions};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

/// Subscription routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_subscription))
        .route("/{id}", get(get_subscription))
        .route("/{id}/renew", post(renew_subscription))
        .route("/{id}/cancel", post(cancel_subscription))
        .route("/client/{client_id}", get(list_client_subscriptions))
}

/// POST /api/subscriptions
async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSubscriptionRequest>,
) -> OwnBotResult<Json<Subscription>> {
    validate_request(&body)?;

    let client = clients::find_by_id(&state.db.pg, body.client_id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Client".into(),
        })?;

    // One serving subscription per client at a time
    if subscriptions::find_serving_for_client(&state.db.pg, client.id)
        .await?
        .is_some()
    {
        return Err(OwnBotError::AlreadyExists {
            resource: "Active subscription".into(),
        });
    }

    let term_days = body.term_days.unwrap_or(body.plan.default_term_days());
    let expires_at = Utc::now() + Duration::days(term_days);

    let subscription = subscriptions::create_subscription(
        &state.db.pg,
        ids::generate_id(),
        client.id,
        body.plan,
        expires_at,
    )
    .await?;

    tracing::info!(
        subscription_id = %subscription.id,
        client_id = %client.id,
        plan = ?subscription.plan,
        expires_at = %subscription.expires_at,
        "Subscription created"
    );

    Ok(Json(subscription))
}

/// GET /api/subscriptions/:id
async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> OwnBotResult<Json<Subscription>> {
    let subscription = subscriptions::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Subscription".into(),
        })?;

    Ok(Json(subscription))
}

/// GET /api/subscriptions/client/:client_id
async fn list_client_subscriptions(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
) -> OwnBotResult<Json<Vec<Subscription>>> {
    let subs = subscriptions::list_client_subscriptions(&state.db.pg, client_id).await?;
    Ok(Json(subs))
}

/// POST /api/subscriptions/:id/renew
async fn renew_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<RenewSubscriptionRequest>,
) -> OwnBotResult<Json<Subscription>> {
    validate_request(&body)?;

    let existing = subscriptions::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Subscription".into(),
        })?;

    // Cancelled plans need a fresh subscription, not a renewal
    if existing.status == SubscriptionStatus::Cancelled {
        return Err(OwnBotError::Validation {
            message: "Cancelled subscriptions cannot be renewed".into(),
        });
    }

    let renewed = subscriptions::renew(&state.db.pg, id, body.extend_days).await?;

    tracing::info!(
        subscription_id = %id,
        extend_days = body.extend_days,
        expires_at = %renewed.expires_at,
        "Subscription renewed"
    );

    Ok(Json(renewed))
}

/// POST /api/subscriptions/:id/cancel
async fn cancel_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> OwnBotResult<Json<Subscription>> {
    let _existing = subscriptions::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Subscription".into(),
        })?;

    let cancelled = subscriptions::cancel(&state.db.pg, id).await?;

    tracing::info!(subscription_id = %id, "Subscription cancelled");

    Ok(Json(cancelled))
}
