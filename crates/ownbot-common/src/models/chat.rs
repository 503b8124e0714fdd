//! Chat models — sessions, messages, and the widget wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A conversation between one visitor and one client's bot.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    pub id: Uuid,
    pub client_id: Uuid,
    pub channel: ChatChannel,
    /// Caller-provided visitor handle (widget cookie, wa number, caller id)
    pub visitor_id: String,
    pub started_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChatChannel {
    Web,
    Whatsapp,
    Voice,
}

impl ChatChannel {
    /// Every supported channel, in the order the capability descriptor lists them.
    pub const ALL: [ChatChannel; 3] =
        [ChatChannel::Whatsapp, ChatChannel::Voice, ChatChannel::Web];
}

/// One utterance within a session.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Visitor,
    Assistant,
}

/// Widget request: post a visitor message.
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,

    /// Stable visitor handle; the session is keyed by (client, channel, visitor).
    #[validate(length(min = 1, max = 128, message = "Visitor id must be 1-128 characters"))]
    pub visitor_id: String,

    /// Defaults to `web` when omitted.
    pub channel: Option<ChatChannel>,
}

/// Widget response: the assistant's reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: Uuid,
    pub reply: String,
    /// Documents whose chunks informed the reply
    pub sources: Vec<Uuid>,
}
