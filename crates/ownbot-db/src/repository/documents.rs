//! Document repository — document rows, chunk storage, and retrieval.

use ownbot_common::models::document::{Document, RankedChunk};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a document row in `processing` state.
pub async fn create_document(
    pool: &PgPool,
    id: Uuid,
    client_id: Uuid,
    filename: &str,
    content_type: &str,
    size: i64,
) -> Result<Document, sqlx::Error> {
    sqlx::query_as::<_, Document>(
        r#"
        INSERT INTO documents (id, client_id, filename, content_type, size, status, chunk_count, uploaded_at)
        VALUES ($1, $2, $3, $4, $5, 'processing', 0, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(client_id)
    .bind(filename)
    .bind(content_type)
    .bind(size)
    .fetch_one(pool)
    .await
}

/// Mark a document ready once its chunks are ingested.
pub async fn mark_ready(
    pool: &PgPool,
    id: Uuid,
    chunk_count: i32,
) -> Result<Document, sqlx::Error> {
    sqlx::query_as::<_, Document>(
        r#"
        UPDATE documents SET status = 'ready', chunk_count = $2, error = NULL
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(chunk_count)
    .fetch_one(pool)
    .await
}

/// Mark a document failed with the ingestion error.
pub async fn mark_failed(pool: &PgPool, id: Uuid, error: &str) -> Result<Document, sqlx::Error> {
    sqlx::query_as::<_, Document>(
        r#"
        UPDATE documents SET status = 'failed', error = $2
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(error)
    .fetch_one(pool)
    .await
}

/// Find a document by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Document>, sqlx::Error> {
    sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List a client's documents, newest first.
pub async fn list_client_documents(
    pool: &PgPool,
    client_id: Uuid,
) -> Result<Vec<Document>, sqlx::Error> {
    sqlx::query_as::<_, Document>(
        "SELECT * FROM documents WHERE client_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(client_id)
    .fetch_all(pool)
    .await
}

/// Number of documents a client currently has.
pub async fn count_client_documents(pool: &PgPool, client_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents WHERE client_id = $1")
        .bind(client_id)
        .fetch_one(pool)
        .await
}

/// Delete a document. Chunks cascade.
pub async fn delete_document(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert a document's chunks in one transaction.
pub async fn insert_chunks(
    pool: &PgPool,
    document_id: Uuid,
    client_id: Uuid,
    chunks: &[String],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for (seq, content) in chunks.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO document_chunks (id, document_id, client_id, seq, content)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ownbot_common::ids::generate_id())
        .bind(document_id)
        .bind(client_id)
        .bind(seq as i32)
        .bind(content)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

/// Rank a client's ready chunks against a query with Postgres full-text search.
pub async fn search_chunks(
    pool: &PgPool,
    client_id: Uuid,
    query: &str,
    top_k: i64,
) -> Result<Vec<RankedChunk>, sqlx::Error> {
    sqlx::query_as::<_, RankedChunk>(
        r#"
        SELECT c.document_id, c.seq, c.content,
               ts_rank(to_tsvector('english', c.content), plainto_tsquery('english', $2)) AS rank
        FROM document_chunks c
        INNER JOIN documents d ON d.id = c.document_id AND d.status = 'ready'
        WHERE c.client_id = $1
          AND to_tsvector('english', c.content) @@ plainto_tsquery('english', $2)
        ORDER BY rank DESC
        LIMIT $3
        "#,
    )
    .bind(client_id)
    .bind(query)
    .bind(top_k)
    .fetch_all(pool)
    .await
}
