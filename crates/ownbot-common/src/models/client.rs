//! Client model — a tenant business on the platform.
//!
//! Each client owns a knowledge base, a subscription, provisioned phone
//! numbers, and chat sessions. The widget API key is generated server-side
//! and stored only as a SHA-256 digest; the plaintext is shown exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A tenant business.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,

    /// Display name of the business
    pub name: String,

    pub business_type: BusinessType,

    /// Contact address for billing and subscription warnings
    pub contact_email: String,

    /// Deactivated clients keep their data but stop serving chat
    pub active: bool,

    /// SHA-256 hex digest of the widget API key
    #[serde(skip_serializing)]
    pub api_key_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Supported business verticals (drives prompt tone and the capability descriptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Restaurant,
    Gym,
    Clinic,
    Retail,
    Other,
}

impl BusinessType {
    /// Every supported vertical, in the order the capability descriptor lists them.
    pub const ALL: [BusinessType; 5] = [
        BusinessType::Restaurant,
        BusinessType::Gym,
        BusinessType::Clinic,
        BusinessType::Retail,
        BusinessType::Other,
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 120, message = "Client name must be 1-120 characters"))]
    pub name: String,

    pub business_type: BusinessType,

    #[validate(email(message = "Contact email must be a valid address"))]
    pub contact_email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,

    pub business_type: Option<BusinessType>,

    #[validate(email)]
    pub contact_email: Option<String>,

    pub active: Option<bool>,
}

/// Returned on create and key rotation — the only times the plaintext key exists.
#[derive(Debug, Serialize)]
pub struct ClientWithKey {
    #[serde(flatten)]
    pub client: Client,
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_type_uses_snake_case_wire_form() {
        let json = serde_json::to_string(&BusinessType::Restaurant).unwrap();
        assert_eq!(json, "\"restaurant\"");
        let parsed: BusinessType = serde_json::from_str("\"gym\"").unwrap();
        assert_eq!(parsed, BusinessType::Gym);
    }

    #[test]
    fn api_key_hash_never_serializes() {
        let client = Client {
            id: Uuid::now_v7(),
            name: "Trattoria Roma".into(),
            business_type: BusinessType::Restaurant,
            contact_email: "owner@trattoria.example".into(),
            active: true,
            api_key_hash: "deadbeef".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&client).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("api_key_hash"));
    }
}
