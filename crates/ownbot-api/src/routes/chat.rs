//! Chat routes — the widget-facing conversation API.
//!
//! All routes require the client's widget key (`X-Api-Key`); the key is
//! what binds a session to a tenant.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use ownbot_common::{
    error::{OwnBotError, OwnBotResult},
    ids,
    models::chat::{ChatChannel, ChatMessage, ChatReply, ChatSession, MessageRole, PostMessageRequest},
    validation::validate_request,
};
use ownbot_db::repository::{chat, documents};
use std::sync::Arc;
use uuid::Uuid;

use crate::{completion, middleware::ClientContext, AppState};

/// Chat routes, gated by the widget API key.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/messages", post(post_message))
        .route("/sessions", get(list_sessions))
        .route("/sessions/{session_id}", get(session_history))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::client_auth,
        ))
}

/// POST /api/chat/messages
///
/// Stores the visitor's message, retrieves knowledge, generates a reply,
/// and stores that too. An upstream model failure degrades to a
/// retrieval-composed reply — the visitor always gets an answer.
async fn post_message(
    Extension(ctx): Extension<ClientContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<PostMessageRequest>,
) -> OwnBotResult<Json<ChatReply>> {
    validate_request(&body)?;

    let limits = &ownbot_common::config::get().limits;
    if body.message.chars().count() > limits.max_message_length {
        return Err(OwnBotError::Validation {
            message: format!(
                "Message too long (max {} characters)",
                limits.max_message_length
            ),
        });
    }

    let channel = body.channel.unwrap_or(ChatChannel::Web);
    let session = chat::find_or_create_session(
        &state.db.pg,
        ids::generate_id(),
        ctx.client_id,
        channel,
        &body.visitor_id,
    )
    .await?;
    chat::touch_session(&state.db.pg, session.id).await?;

    chat::append_message(
        &state.db.pg,
        ids::generate_id(),
        session.id,
        MessageRole::Visitor,
        &body.message,
    )
    .await?;

    let chunks = documents::search_chunks(
        &state.db.pg,
        ctx.client_id,
        &body.message,
        limits.retrieval_top_k,
    )
    .await?;

    let prompt =
        completion::build_prompt(&ctx.client_name, ctx.business_type, &chunks, &body.message);

    let reply = match state.completion.generate(&prompt).await {
        Ok(Some(text)) => text,
        Ok(None) => completion::compose_fallback_reply(&ctx.client_name, &chunks),
        Err(e) => {
            tracing::warn!(
                client_id = %ctx.client_id,
                error = %e,
                "Completion model unavailable, falling back to retrieval reply"
            );
            completion::compose_fallback_reply(&ctx.client_name, &chunks)
        }
    };

    chat::append_message(
        &state.db.pg,
        ids::generate_id(),
        session.id,
        MessageRole::Assistant,
        &reply,
    )
    .await?;

    let mut sources: Vec<Uuid> = Vec::new();
    for chunk in &chunks {
        if !sources.contains(&chunk.document_id) {
            sources.push(chunk.document_id);
        }
    }

    tracing::info!(
        session_id = %session.id,
        client_id = %ctx.client_id,
        channel = ?channel,
        source_count = sources.len(),
        "Chat reply produced"
    );

    Ok(Json(ChatReply {
        session_id: session.id,
        reply,
        sources,
    }))
}

/// GET /api/chat/sessions
async fn list_sessions(
    Extension(ctx): Extension<ClientContext>,
    State(state): State<Arc<AppState>>,
) -> OwnBotResult<Json<Vec<ChatSession>>> {
    let sessions = chat::list_client_sessions(&state.db.pg, ctx.client_id).await?;
    Ok(Json(sessions))
}

/// GET /api/chat/sessions/:session_id
async fn session_history(
    Extension(ctx): Extension<ClientContext>,
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> OwnBotResult<Json<Vec<ChatMessage>>> {
    let session = chat::find_session(&state.db.pg, session_id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Chat session".into(),
        })?;

    // A key never reads another tenant's sessions
    if session.client_id != ctx.client_id {
        return Err(OwnBotError::NotFound {
            resource: "Chat session".into(),
        });
    }

    let messages = chat::list_session_messages(&state.db.pg, session_id).await?;
    Ok(Json(messages))
}
