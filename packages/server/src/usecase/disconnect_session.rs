//! UseCase: session teardown.
//!
//! Removes the connection from its room. No departure message is
//! broadcast; remaining members simply stop receiving from the peer.

use std::sync::Arc;

use crate::{domain::Session, infrastructure::registry::RoomRegistry};

/// Session teardown on disconnect.
pub struct DisconnectSessionUseCase {
    registry: Arc<RoomRegistry>,
}

impl DisconnectSessionUseCase {
    /// Create a new DisconnectSessionUseCase.
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Remove the session's connection from its room.
    pub async fn execute(&self, session: &Session) {
        self.registry
            .leave(session.room(), &session.connection_id)
            .await;
        tracing::info!(
            "session '{}' ({}) left room '{}'",
            session.connection_id,
            session.email,
            session.room()
        );
    }
}
