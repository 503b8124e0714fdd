//! Centralized error types for OwnBot.
//!
//! Uses `thiserror` for ergonomic error definitions and provides HTTP-friendly
//! error variants that can be directly converted to API responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Core application error type used across all OwnBot services.
#[derive(Debug, thiserror::Error)]
pub enum OwnBotError {
    // === Auth errors ===
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    // === Resource errors ===
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{resource} already exists")]
    AlreadyExists { resource: String },

    // === Validation errors ===
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // === Tenant capacity ===
    #[error("Limit reached: {message}")]
    LimitReached { message: String },

    // === Subscription state ===
    #[error("Subscription inactive: {message}")]
    SubscriptionInactive { message: String },

    // === Upstream model / integration errors ===
    #[error("Upstream service error: {message}")]
    Upstream { message: String },

    // === Infrastructure errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
}

impl OwnBotError {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidApiKey | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::LimitReached { .. } => StatusCode::FORBIDDEN,
            Self::SubscriptionInactive { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &str {
        match self {
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::LimitReached { .. } => "LIMIT_REACHED",
            Self::SubscriptionInactive { .. } => "SUBSCRIPTION_INACTIVE",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for OwnBotError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't leak internal details to clients
        let message = match &self {
            OwnBotError::Database(e) => {
                tracing::error!("Database error: {e}");
                "An internal error occurred".to_string()
            }
            OwnBotError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            code: status.as_u16(),
            error: self.error_code().to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results using OwnBotError.
pub type OwnBotResult<T> = Result<T, OwnBotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            OwnBotError::NotFound { resource: "Client".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            OwnBotError::Validation { message: "bad".into() }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(OwnBotError::InvalidApiKey.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            OwnBotError::Upstream { message: "model down".into() }.status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            OwnBotError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_are_masked() {
        let resp = OwnBotError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"))
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The secret detail must not appear in the envelope; the envelope
        // itself stays structured JSON.
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            OwnBotError::AlreadyExists { resource: "Number".into() }.error_code(),
            "ALREADY_EXISTS"
        );
        assert_eq!(
            OwnBotError::SubscriptionInactive { message: "expired".into() }.error_code(),
            "SUBSCRIPTION_INACTIVE"
        );
    }
}
