//! Phone number repository.

use ownbot_common::models::number::{NumberChannel, NumberStatus, PhoneNumber};
use sqlx::PgPool;
use uuid::Uuid;

/// Register a number for a client, in `pending` state.
pub async fn register_number(
    pool: &PgPool,
    id: Uuid,
    client_id: Uuid,
    e164: &str,
    channel: NumberChannel,
) -> Result<PhoneNumber, sqlx::Error> {
    sqlx::query_as::<_, PhoneNumber>(
        r#"
        INSERT INTO phone_numbers (id, client_id, e164, channel, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 'pending', NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(client_id)
    .bind(e164)
    .bind(channel)
    .fetch_one(pool)
    .await
}

/// Find a number by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PhoneNumber>, sqlx::Error> {
    sqlx::query_as::<_, PhoneNumber>("SELECT * FROM phone_numbers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a number by its E.164 value.
pub async fn find_by_e164(pool: &PgPool, e164: &str) -> Result<Option<PhoneNumber>, sqlx::Error> {
    sqlx::query_as::<_, PhoneNumber>("SELECT * FROM phone_numbers WHERE e164 = $1")
        .bind(e164)
        .fetch_optional(pool)
        .await
}

/// List a client's numbers.
pub async fn list_client_numbers(
    pool: &PgPool,
    client_id: Uuid,
) -> Result<Vec<PhoneNumber>, sqlx::Error> {
    sqlx::query_as::<_, PhoneNumber>(
        "SELECT * FROM phone_numbers WHERE client_id = $1 ORDER BY created_at",
    )
    .bind(client_id)
    .fetch_all(pool)
    .await
}

/// Number of numbers a client currently holds (released ones included).
pub async fn count_client_numbers(pool: &PgPool, client_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM phone_numbers WHERE client_id = $1")
        .bind(client_id)
        .fetch_one(pool)
        .await
}

/// Transition a number's status.
pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: NumberStatus,
) -> Result<PhoneNumber, sqlx::Error> {
    sqlx::query_as::<_, PhoneNumber>(
        r#"
        UPDATE phone_numbers SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await
}

/// Delete a number row entirely.
pub async fn delete_number(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM phone_numbers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
