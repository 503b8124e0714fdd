//! Subscription repository — lifecycle queries and the expiry sweep.

use chrono::{DateTime, Utc};
use ownbot_common::models::subscription::{Plan, Subscription, SubscriptionCheckReport};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a subscription for a client.
pub async fn create_subscription(
    pool: &PgPool,
    id: Uuid,
    client_id: Uuid,
    plan: Plan,
    expires_at: DateTime<Utc>,
) -> Result<Subscription, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (id, client_id, plan, status, started_at, expires_at, created_at, updated_at)
        VALUES ($1, $2, $3, 'active', NOW(), $4, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(client_id)
    .bind(plan)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Find a subscription by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List a client's subscriptions, newest first.
pub async fn list_client_subscriptions(
    pool: &PgPool,
    client_id: Uuid,
) -> Result<Vec<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE client_id = $1 ORDER BY created_at DESC",
    )
    .bind(client_id)
    .fetch_all(pool)
    .await
}

/// The client's current serving subscription, if any.
pub async fn find_serving_for_client(
    pool: &PgPool,
    client_id: Uuid,
) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT * FROM subscriptions
        WHERE client_id = $1 AND status IN ('active', 'warned') AND expires_at > NOW()
        ORDER BY expires_at DESC
        LIMIT 1
        "#,
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await
}

/// Cancel a subscription.
pub async fn cancel(pool: &PgPool, id: Uuid) -> Result<Subscription, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        UPDATE subscriptions SET status = 'cancelled', updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Extend a subscription and reset its warning state.
///
/// Extension counts from the current expiry, or from now when the
/// subscription already lapsed.
pub async fn renew(
    pool: &PgPool,
    id: Uuid,
    extend_days: i64,
) -> Result<Subscription, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        UPDATE subscriptions SET
            status = 'active',
            warned_at = NULL,
            expires_at = GREATEST(expires_at, NOW()) + make_interval(days => $2::int),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(extend_days)
    .fetch_one(pool)
    .await
}

/// Mark overdue subscriptions expired. Returns how many rows changed.
pub async fn expire_overdue(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE subscriptions SET status = 'expired', updated_at = NOW()
        WHERE status IN ('active', 'warned') AND expires_at <= NOW()
        "#,
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Warn active subscriptions expiring inside the window. Each subscription
/// is warned at most once (`warned_at` gate). Returns how many rows changed.
pub async fn warn_expiring(pool: &PgPool, window_days: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE subscriptions SET status = 'warned', warned_at = NOW(), updated_at = NOW()
        WHERE status = 'active'
          AND warned_at IS NULL
          AND expires_at > NOW()
          AND expires_at <= NOW() + make_interval(days => $1::int)
        "#,
    )
    .bind(window_days)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// The subscription sweep: expire overdue rows, then warn the ones
/// approaching expiry. Counts are the row counts of the two updates —
/// a sweep that matches nothing reports zeroes.
pub async fn run_check(
    pool: &PgPool,
    warn_window_days: i64,
) -> Result<SubscriptionCheckReport, sqlx::Error> {
    let expired_count = expire_overdue(pool).await?;
    let warned_count = warn_expiring(pool, warn_window_days).await?;

    if expired_count > 0 || warned_count > 0 {
        tracing::info!(expired_count, warned_count, "Subscription sweep updated rows");
    }

    Ok(SubscriptionCheckReport {
        expired_count,
        warned_count,
    })
}
