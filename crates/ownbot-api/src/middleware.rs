//! Middleware — widget API-key authentication and the admin guard.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use ownbot_common::error::OwnBotError;
use ownbot_common::models::client::BusinessType;
use ownbot_db::repository::{clients, subscriptions};
use std::sync::Arc;

use crate::{auth, AppState};

/// Tenant context extracted from the `X-Api-Key` header.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub client_id: uuid::Uuid,
    pub client_name: String,
    pub business_type: BusinessType,
}

/// Resolve the calling client from `X-Api-Key` and gate on its
/// subscription. Chat traffic is the billable surface, so an expired or
/// cancelled subscription stops serving here.
pub async fn client_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, OwnBotError> {
    let key = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .ok_or(OwnBotError::InvalidApiKey)?;

    let digest = auth::hash_api_key(key);
    let client = clients::find_by_api_key_hash(&state.db.pg, &digest)
        .await?
        .ok_or(OwnBotError::InvalidApiKey)?;

    if !client.active {
        return Err(OwnBotError::Forbidden);
    }

    if subscriptions::find_serving_for_client(&state.db.pg, client.id)
        .await?
        .is_none()
    {
        return Err(OwnBotError::SubscriptionInactive {
            message: "No active subscription for this client".into(),
        });
    }

    let ctx = ClientContext {
        client_id: client.id,
        client_name: client.name,
        business_type: client.business_type,
    };

    // Insert tenant context into request extensions for handlers to use
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}

/// Require the configured admin bearer token.
///
/// An empty configured token locks the admin surface entirely.
pub async fn admin_auth(request: Request, next: Next) -> Result<Response, OwnBotError> {
    let expected = &ownbot_common::config::get().auth.admin_token;
    if expected.is_empty() {
        return Err(OwnBotError::Unauthorized);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(OwnBotError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(OwnBotError::Unauthorized)?;

    if token != expected {
        return Err(OwnBotError::Unauthorized);
    }

    Ok(next.run(request).await)
}
