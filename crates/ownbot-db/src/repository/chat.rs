//! Chat repository — sessions and messages.

use ownbot_common::models::chat::{ChatChannel, ChatMessage, ChatSession, MessageRole};
use sqlx::PgPool;
use uuid::Uuid;

/// Find the session for (client, channel, visitor), creating it on first contact.
pub async fn find_or_create_session(
    pool: &PgPool,
    id: Uuid,
    client_id: Uuid,
    channel: ChatChannel,
    visitor_id: &str,
) -> Result<ChatSession, sqlx::Error> {
    let existing = sqlx::query_as::<_, ChatSession>(
        r#"
        SELECT * FROM chat_sessions
        WHERE client_id = $1 AND channel = $2 AND visitor_id = $3
        "#,
    )
    .bind(client_id)
    .bind(channel)
    .bind(visitor_id)
    .fetch_optional(pool)
    .await?;

    if let Some(session) = existing {
        return Ok(session);
    }

    sqlx::query_as::<_, ChatSession>(
        r#"
        INSERT INTO chat_sessions (id, client_id, channel, visitor_id, started_at, last_active_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(client_id)
    .bind(channel)
    .bind(visitor_id)
    .fetch_one(pool)
    .await
}

/// Find a session by ID.
pub async fn find_session(pool: &PgPool, id: Uuid) -> Result<Option<ChatSession>, sqlx::Error> {
    sqlx::query_as::<_, ChatSession>("SELECT * FROM chat_sessions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List a client's sessions, most recently active first.
pub async fn list_client_sessions(
    pool: &PgPool,
    client_id: Uuid,
) -> Result<Vec<ChatSession>, sqlx::Error> {
    sqlx::query_as::<_, ChatSession>(
        "SELECT * FROM chat_sessions WHERE client_id = $1 ORDER BY last_active_at DESC",
    )
    .bind(client_id)
    .fetch_all(pool)
    .await
}

/// Bump a session's activity timestamp.
pub async fn touch_session(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE chat_sessions SET last_active_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Append a message to a session.
pub async fn append_message(
    pool: &PgPool,
    id: Uuid,
    session_id: Uuid,
    role: MessageRole,
    content: &str,
) -> Result<ChatMessage, sqlx::Error> {
    sqlx::query_as::<_, ChatMessage>(
        r#"
        INSERT INTO chat_messages (id, session_id, role, content, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(session_id)
    .bind(role)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// A session's messages in order.
pub async fn list_session_messages(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    sqlx::query_as::<_, ChatMessage>(
        "SELECT * FROM chat_messages WHERE session_id = $1 ORDER BY created_at",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}
