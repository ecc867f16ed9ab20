//! WebSocket event DTOs.
//!
//! Events are tagged by an `event` field; the message body is the tagged
//! `ChatPayload` from the domain (`kind`: `plain-text` | `file-delta`).

use serde::{Deserialize, Serialize};

use crate::domain::ChatPayload;

/// Sender attribution on a broadcast message: a user, or the synthetic AI
/// sender object (`{"email": "AI"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderDto {
    pub email: String,
}

impl SenderDto {
    /// Email value used for messages authored by the AI collaborator.
    pub const AI_EMAIL: &'static str = "AI";

    /// A user sender.
    pub fn user(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// The synthetic AI sender.
    pub fn ai() -> Self {
        Self {
            email: Self::AI_EMAIL.to_string(),
        }
    }

    /// Whether this sender is the AI collaborator.
    pub fn is_ai(&self) -> bool {
        self.email == Self::AI_EMAIL
    }
}

/// Events a client may send to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Chat text or a piggybacked file delta for the project room
    ProjectMessage {
        message: ChatPayload,
        /// Client-supplied attribution; the server replaces it with the
        /// session identity so it cannot be spoofed
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<SenderDto>,
    },
}

/// Events the server sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A room broadcast: another member's message, or an AI reply
    ProjectMessage {
        message: ChatPayload,
        sender: SenderDto,
    },
    /// Informational post-admit greeting; no client handling required
    Welcome {
        #[serde(rename = "projectId")]
        project_id: String,
        name: String,
        users: Vec<String>,
    },
    /// Operational error delivered to the originating session only
    Error { message: String },
}
