//! Phone number routes — register, transition, release.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ownbot_common::{
    error::{OwnBotError, OwnBotResult},
    ids,
    models::number::{NumberStatus, PhoneNumber, RegisterNumberRequest},
    validation::{validate_e164, validate_request},
};
use ownbot_db::repository::{clients, numbers};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

/// Number routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(register_number))
        .route("/{id}", get(get_number).delete(delete_number))
        .route("/{id}/activate", post(activate_number))
        .route("/{id}/release", post(release_number))
        .route("/client/{client_id}", get(list_client_numbers))
}

/// POST /api/numbers
async fn register_number(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterNumberRequest>,
) -> OwnBotResult<Json<PhoneNumber>> {
    validate_request(&body)?;
    validate_e164(&body.e164)?;

    let client = clients::find_by_id(&state.db.pg, body.client_id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Client".into(),
        })?;

    if numbers::find_by_e164(&state.db.pg, &body.e164).await?.is_some() {
        return Err(OwnBotError::AlreadyExists {
            resource: "Phone number".into(),
        });
    }

    let limits = &ownbot_common::config::get().limits;
    let held = numbers::count_client_numbers(&state.db.pg, client.id).await?;
    if held >= limits.max_numbers_per_client {
        return Err(OwnBotError::LimitReached {
            message: format!(
                "Client already holds {held} numbers (max {})",
                limits.max_numbers_per_client
            ),
        });
    }

    let number = numbers::register_number(
        &state.db.pg,
        ids::generate_id(),
        client.id,
        &body.e164,
        body.channel,
    )
    .await?;

    tracing::info!(
        number_id = %number.id,
        client_id = %client.id,
        e164 = %number.e164,
        channel = ?number.channel,
        "Phone number registered"
    );

    Ok(Json(number))
}

/// GET /api/numbers/:id
async fn get_number(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> OwnBotResult<Json<PhoneNumber>> {
    let number = numbers::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Phone number".into(),
        })?;

    Ok(Json(number))
}

/// GET /api/numbers/client/:client_id
async fn list_client_numbers(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
) -> OwnBotResult<Json<Vec<PhoneNumber>>> {
    let list = numbers::list_client_numbers(&state.db.pg, client_id).await?;
    Ok(Json(list))
}

/// POST /api/numbers/:id/activate
async fn activate_number(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> OwnBotResult<Json<PhoneNumber>> {
    let number = numbers::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Phone number".into(),
        })?;

    // Released numbers stay released; re-provisioning means a new row
    if number.status == NumberStatus::Released {
        return Err(OwnBotError::Validation {
            message: "Released numbers cannot be reactivated".into(),
        });
    }

    let updated = numbers::set_status(&state.db.pg, id, NumberStatus::Active).await?;

    tracing::info!(number_id = %id, e164 = %updated.e164, "Phone number activated");

    Ok(Json(updated))
}

/// POST /api/numbers/:id/release
async fn release_number(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> OwnBotResult<Json<PhoneNumber>> {
    let _number = numbers::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Phone number".into(),
        })?;

    let updated = numbers::set_status(&state.db.pg, id, NumberStatus::Released).await?;

    tracing::info!(number_id = %id, e164 = %updated.e164, "Phone number released");

    Ok(Json(updated))
}

/// DELETE /api/numbers/:id
async fn delete_number(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> OwnBotResult<Json<serde_json::Value>> {
    let _number = numbers::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Phone number".into(),
        })?;

    numbers::delete_number(&state.db.pg, id).await?;

    tracing::info!(number_id = %id, "Phone number deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
