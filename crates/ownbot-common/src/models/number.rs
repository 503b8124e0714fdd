//! Phone number models — provisioned numbers bound to a client.
//!
//! Numbers are managed as records; carrier provisioning happens outside
//! this service and is reflected here by the status transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A phone number provisioned for a client.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhoneNumber {
    pub id: Uuid,
    pub client_id: Uuid,
    /// E.164 form, unique across the platform
    pub e164: String,
    pub channel: NumberChannel,
    pub status: NumberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NumberChannel {
    Whatsapp,
    Voice,
}

/// pending → active → released. Released numbers keep their row for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NumberStatus {
    Pending,
    Active,
    Released,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterNumberRequest {
    pub client_id: Uuid,

    /// E.164 phone number, e.g. `+14155552671`
    #[validate(length(min = 9, max = 16, message = "Phone number must be E.164"))]
    pub e164: String,

    pub channel: NumberChannel,
}
