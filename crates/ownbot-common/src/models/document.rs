//! Document models — the per-client knowledge base.
//!
//! Uploaded documents are split into bounded chunks; chunks are what the
//! chat reply engine retrieves and ranks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded knowledge document.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub client_id: Uuid,
    pub filename: String,
    pub content_type: String,
    /// Raw upload size in bytes
    pub size: i64,
    pub status: DocumentStatus,
    /// Number of chunks ingested (0 until ready)
    pub chunk_count: i32,
    /// Populated when ingestion fails
    pub error: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Processing,
    Ready,
    Failed,
}

/// A retrievable slice of a document.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub client_id: Uuid,
    /// Position within the source document
    pub seq: i32,
    pub content: String,
}

/// A ranked chunk returned by retrieval.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RankedChunk {
    pub document_id: Uuid,
    pub seq: i32,
    pub content: String,
    pub rank: f32,
}
