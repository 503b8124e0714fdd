//! Client routes — tenant CRUD and widget key rotation.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ownbot_common::{
    error::{OwnBotError, OwnBotResult},
    ids,
    models::client::{Client, ClientWithKey, CreateClientRequest, UpdateClientRequest},
    validation::validate_request,
};
use ownbot_db::repository::clients;
use std::sync::Arc;
use uuid::Uuid;

use crate::{auth, AppState};

/// Client routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/{client_id}",
            get(get_client).patch(update_client).delete(delete_client),
        )
        .route("/{client_id}/rotate-key", post(rotate_key))
}

/// POST /api/clients
///
/// The response carries the plaintext widget key — the only time it exists.
async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateClientRequest>,
) -> OwnBotResult<Json<ClientWithKey>> {
    validate_request(&body)?;

    let api_key = auth::generate_api_key();
    let client = clients::create_client(
        &state.db.pg,
        ids::generate_id(),
        &body.name,
        body.business_type,
        &body.contact_email,
        &auth::hash_api_key(&api_key),
    )
    .await?;

    tracing::info!(
        client_id = %client.id,
        name = %client.name,
        business_type = ?client.business_type,
        "Client created"
    );

    Ok(Json(ClientWithKey { client, api_key }))
}

/// GET /api/clients
async fn list_clients(State(state): State<Arc<AppState>>) -> OwnBotResult<Json<Vec<Client>>> {
    let client_list = clients::list_clients(&state.db.pg).await?;
    Ok(Json(client_list))
}

/// GET /api/clients/:client_id
async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
) -> OwnBotResult<Json<Client>> {
    let client = clients::find_by_id(&state.db.pg, client_id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Client".into(),
        })?;

    Ok(Json(client))
}

/// PATCH /api/clients/:client_id
async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
    Json(body): Json<UpdateClientRequest>,
) -> OwnBotResult<Json<Client>> {
    validate_request(&body)?;

    let _existing = clients::find_by_id(&state.db.pg, client_id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Client".into(),
        })?;

    let updated = clients::update_client(
        &state.db.pg,
        client_id,
        body.name.as_deref(),
        body.business_type,
        body.contact_email.as_deref(),
        body.active,
    )
    .await?;

    Ok(Json(updated))
}

/// POST /api/clients/:client_id/rotate-key
///
/// Invalidates the previous key immediately.
async fn rotate_key(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
) -> OwnBotResult<Json<ClientWithKey>> {
    let _existing = clients::find_by_id(&state.db.pg, client_id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Client".into(),
        })?;

    let api_key = auth::generate_api_key();
    let client =
        clients::update_api_key_hash(&state.db.pg, client_id, &auth::hash_api_key(&api_key))
            .await?;

    tracing::info!(client_id = %client_id, "Widget API key rotated");

    Ok(Json(ClientWithKey { client, api_key }))
}

/// DELETE /api/clients/:client_id
async fn delete_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
) -> OwnBotResult<Json<serde_json::Value>> {
    let _existing = clients::find_by_id(&state.db.pg, client_id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Client".into(),
        })?;

    clients::delete_client(&state.db.pg, client_id).await?;

    tracing::info!(client_id = %client_id, "Client deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
