//! Client repository.

use ownbot_common::models::client::{BusinessType, Client};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new client.
pub async fn create_client(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    business_type: BusinessType,
    contact_email: &str,
    api_key_hash: &str,
) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (id, name, business_type, contact_email, active, api_key_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, true, $5, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(business_type)
    .bind(contact_email)
    .bind(api_key_hash)
    .fetch_one(pool)
    .await
}

/// Find a client by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Look a client up by the digest of its widget API key.
pub async fn find_by_api_key_hash(
    pool: &PgPool,
    api_key_hash: &str,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE api_key_hash = $1")
        .bind(api_key_hash)
        .fetch_optional(pool)
        .await
}

/// List all clients, newest first.
pub async fn list_clients(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Update a client.
pub async fn update_client(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    business_type: Option<BusinessType>,
    contact_email: Option<&str>,
    active: Option<bool>,
) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients SET
            name = COALESCE($2, name),
            business_type = COALESCE($3, business_type),
            contact_email = COALESCE($4, contact_email),
            active = COALESCE($5, active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(business_type)
    .bind(contact_email)
    .bind(active)
    .fetch_one(pool)
    .await
}

/// Replace the stored API key digest (key rotation).
pub async fn update_api_key_hash(
    pool: &PgPool,
    id: Uuid,
    api_key_hash: &str,
) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients SET api_key_hash = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(api_key_hash)
    .fetch_one(pool)
    .await
}

/// Delete a client. Cascades to subscriptions, documents, numbers, and chat.
pub async fn delete_client(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
