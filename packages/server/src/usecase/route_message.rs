//! UseCase: message routing (the Message Router).
//!
//! One inbound event type per connection, fanned out to the rest of the
//! room. Plain chat goes to every *other* member (the sender appends its
//! own message optimistically client-side). A message containing the AI
//! trigger additionally produces a synthetic AI-sender reply emitted to
//! the WHOLE room, sender included. File deltas ride the same channel and
//! are pure pass-through; only clients interpret them.

use std::sync::Arc;

use crate::{
    domain::{ChatPayload, ProjectId, Session},
    infrastructure::{
        ai::AiCollaborator,
        dto::websocket::{SenderDto, ServerEvent},
        registry::RoomRegistry,
    },
};

use super::error::RouteMessageError;

/// The Message Router.
pub struct RouteMessageUseCase {
    registry: Arc<RoomRegistry>,
    ai: Arc<dyn AiCollaborator>,
}

impl RouteMessageUseCase {
    /// Create a new RouteMessageUseCase.
    pub fn new(registry: Arc<RoomRegistry>, ai: Arc<dyn AiCollaborator>) -> Self {
        Self { registry, ai }
    }

    /// Broadcast `payload` to every room member except the sender.
    ///
    /// Returns the stripped AI prompt when the payload carries the trigger
    /// substring, so the caller can run the AI leg separately.
    pub async fn broadcast(&self, session: &Session, payload: ChatPayload) -> Option<String> {
        let prompt = payload.ai_prompt();

        let event = ServerEvent::ProjectMessage {
            message: payload,
            sender: SenderDto::user(session.email.as_str()),
        };
        let wire = serde_json::to_string(&event).expect("server event serialization cannot fail");
        self.registry
            .send_to_others(session.room(), &session.connection_id, &wire)
            .await;

        prompt
    }

    /// Invoke the AI collaborator with an already-stripped prompt.
    pub async fn invoke_ai(&self, prompt: &str) -> Result<String, RouteMessageError> {
        self.ai
            .complete(prompt)
            .await
            .map_err(|e| RouteMessageError::AiUpstream(e.to_string()))
    }

    /// Emit the synthetic AI reply to the whole room, sender included.
    ///
    /// Addressed at the room, not the session: if the original sender has
    /// disconnected by now, the reply still reaches the remaining members.
    pub async fn broadcast_ai_reply(&self, room: &ProjectId, reply: String) {
        let event = ServerEvent::ProjectMessage {
            message: ChatPayload::PlainText { text: reply },
            sender: SenderDto::ai(),
        };
        let wire = serde_json::to_string(&event).expect("server event serialization cannot fail");
        self.registry.send_to_room(room, &wire).await;
    }
}
