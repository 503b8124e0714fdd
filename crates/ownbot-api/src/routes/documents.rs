//! Document routes — knowledge base upload and management.
//!
//! POST   /api/documents                  — Upload a document (multipart/form-data)
//! GET    /api/documents/:id              — Document metadata
//! GET    /api/documents/client/:id       — A client's documents
//! DELETE /api/documents/:id              — Delete a document (chunks cascade)

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use ownbot_common::{
    error::{OwnBotError, OwnBotResult},
    ids,
    models::document::Document,
};
use ownbot_db::repository::{clients, documents};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

/// Ingestible content types. The knowledge pipeline works on UTF-8 text;
/// everything else is rejected up front.
fn is_ingestible_content_type(ct: &str) -> bool {
    matches!(ct, "text/plain" | "text/markdown" | "text/csv")
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(upload_document))
        .route("/{id}", get(get_document).delete(delete_document))
        .route("/client/{client_id}", get(list_client_documents))
}

// ============================================================
// POST /api/documents
// ============================================================

/// Upload a knowledge document via multipart/form-data.
///
/// Form fields:
/// - `file`      — the document (required)
/// - `client_id` — owning client (required)
async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> OwnBotResult<Json<Document>> {
    let limits = &ownbot_common::config::get().limits;

    let mut file_data: Option<Vec<u8>> = None;
    let mut filename = String::from("upload.txt");
    let mut content_type: Option<String> = None;
    let mut client_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OwnBotError::Validation {
            message: format!("Multipart error: {e}"),
        })?
    {
        match field.name() {
            Some("file") => {
                if let Some(fn_) = field.file_name() {
                    filename = sanitize_filename(fn_);
                }
                if let Some(ct) = field.content_type() {
                    content_type = Some(ct.to_string());
                }

                let bytes = field.bytes().await.map_err(|e| OwnBotError::Validation {
                    message: format!("Failed to read file: {e}"),
                })?;

                if bytes.len() > limits.max_document_bytes {
                    return Err(OwnBotError::Validation {
                        message: format!(
                            "File too large: {} bytes (max {} bytes)",
                            bytes.len(),
                            limits.max_document_bytes
                        ),
                    });
                }

                file_data = Some(bytes.to_vec());
            }
            Some("client_id") => {
                let val = field.text().await.unwrap_or_default();
                client_id = Uuid::parse_str(val.trim()).ok();
            }
            _ => {} // Ignore unknown fields
        }
    }

    let data = file_data.ok_or(OwnBotError::Validation {
        message: "No file field in request".into(),
    })?;
    let client_id = client_id.ok_or(OwnBotError::Validation {
        message: "Missing or invalid client_id field".into(),
    })?;

    // Fall back to a filename-based guess when the field had no content-type
    let content_type = content_type
        .or_else(|| {
            mime_guess::from_path(&filename)
                .first_raw()
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string());

    if !is_ingestible_content_type(&content_type) {
        return Err(OwnBotError::Validation {
            message: format!("Content type '{content_type}' is not ingestible"),
        });
    }

    let client = clients::find_by_id(&state.db.pg, client_id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Client".into(),
        })?;

    let doc_count = documents::count_client_documents(&state.db.pg, client.id).await?;
    if doc_count >= limits.max_documents_per_client {
        return Err(OwnBotError::LimitReached {
            message: format!(
                "Client already has {doc_count} documents (max {})",
                limits.max_documents_per_client
            ),
        });
    }

    let document = documents::create_document(
        &state.db.pg,
        ids::generate_id(),
        client.id,
        &filename,
        &content_type,
        data.len() as i64,
    )
    .await?;

    // Ingest inline: decode, chunk, persist. A failure leaves the row in
    // `failed` state rather than failing the upload.
    let document = match String::from_utf8(data) {
        Ok(text) => {
            let chunks = chunk_text(&text, limits.max_chunk_chars);
            if chunks.is_empty() {
                documents::mark_failed(&state.db.pg, document.id, "Document contains no text")
                    .await?
            } else {
                documents::insert_chunks(&state.db.pg, document.id, client.id, &chunks).await?;
                documents::mark_ready(&state.db.pg, document.id, chunks.len() as i32).await?
            }
        }
        Err(_) => {
            documents::mark_failed(&state.db.pg, document.id, "Document is not valid UTF-8")
                .await?
        }
    };

    tracing::info!(
        document_id = %document.id,
        client_id = %client.id,
        filename = %document.filename,
        status = ?document.status,
        chunk_count = document.chunk_count,
        "Document uploaded"
    );

    Ok(Json(document))
}

// ============================================================
// Reads and deletion
// ============================================================

/// GET /api/documents/:id
async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> OwnBotResult<Json<Document>> {
    let document = documents::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Document".into(),
        })?;

    Ok(Json(document))
}

/// GET /api/documents/client/:client_id
async fn list_client_documents(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
) -> OwnBotResult<Json<Vec<Document>>> {
    let docs = documents::list_client_documents(&state.db.pg, client_id).await?;
    Ok(Json(docs))
}

/// DELETE /api/documents/:id
async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> OwnBotResult<Json<serde_json::Value>> {
    let _document = documents::find_by_id(&state.db.pg, id)
        .await?
        .ok_or(OwnBotError::NotFound {
            resource: "Document".into(),
        })?;

    documents::delete_document(&state.db.pg, id).await?;

    tracing::info!(document_id = %id, "Document deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ============================================================
// Helpers
// ============================================================

/// Strip path separators and null bytes from filenames.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .take(255)
        .collect()
}

/// Split text into retrieval chunks of at most `max_chars` characters.
///
/// Splits on blank lines so chunks follow the document's own structure;
/// paragraphs longer than the cap are hard-split on char boundaries.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        for piece in split_oversized(paragraph, max_chars) {
            if current.is_empty() {
                current = piece;
            } else if current.len() + 1 + piece.len() <= max_chars {
                current.push('\n');
                current.push_str(&piece);
            } else {
                chunks.push(current);
                current = piece;
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Hard-split a paragraph that exceeds the cap, respecting char boundaries.
fn split_oversized(paragraph: &str, max_chars: usize) -> Vec<String> {
    if paragraph.len() <= max_chars {
        return vec![paragraph.to_string()];
    }

    let chars: Vec<char> = paragraph.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_lose_path_separators() {
        assert_eq!(sanitize_filename("../etc/passwd"), "..etcpasswd");
        assert_eq!(sanitize_filename("menu\\2026.txt"), "menu2026.txt");
        assert_eq!(sanitize_filename("faq.md"), "faq.md");
    }

    #[test]
    fn only_text_formats_are_ingestible() {
        assert!(is_ingestible_content_type("text/plain"));
        assert!(is_ingestible_content_type("text/markdown"));
        assert!(is_ingestible_content_type("text/csv"));
        assert!(!is_ingestible_content_type("application/pdf"));
        assert!(!is_ingestible_content_type("application/octet-stream"));
        assert!(!is_ingestible_content_type("image/png"));
    }

    #[test]
    fn chunking_respects_paragraphs() {
        let text = "Opening hours.\n\nWe open at 9am.\n\nWe close at 5pm.";
        let chunks = chunk_text(text, 100);
        // All three paragraphs fit into one chunk under the cap
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("9am"));
        assert!(chunks[0].contains("5pm"));
    }

    #[test]
    fn chunking_starts_a_new_chunk_at_the_cap() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = chunk_text(text, 9);
        // "aaaa\nbbbb" fills a chunk; "cccc" starts the next
        assert_eq!(chunks, vec!["aaaa\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn oversized_paragraphs_are_hard_split() {
        let text = "x".repeat(25);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 10));
    }

    #[test]
    fn whitespace_only_text_yields_no_chunks() {
        assert!(chunk_text("  \n\n   \n\n", 100).is_empty());
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "é".repeat(30);
        let chunks = chunk_text(&text, 10);
        assert!(!chunks.is_empty());
        for chunk in chunks {
            assert!(chunk.chars().count() <= 10);
        }
    }
}
