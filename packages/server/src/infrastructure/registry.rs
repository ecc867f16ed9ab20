//! Project room registry.
//!
//! An explicit in-process map of room -> connected sessions, owned by the
//! message router state and living for the process lifetime. Each session
//! is its per-connection send channel; broadcasting to a room iterates its
//! members and pushes onto those channels. Per-sender order is preserved
//! by the channels, cross-sender order is not guaranteed.
//!
//! A multi-process deployment would need an external pub/sub fan-out in
//! place of this map; that is a scaling boundary, not a correctness issue
//! for a single process.

use std::collections::HashMap;

use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::ProjectId;

/// In-process map of project rooms to their connected sessions.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, HashMap<String, UnboundedSender<String>>>>,
}

impl RoomRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Add a connection to the room named after the project id. `sender`
    /// feeds the connection's WebSocket send task.
    pub async fn join(&self, room: &ProjectId, connection_id: &str, sender: UnboundedSender<String>) {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room.as_str().to_string())
            .or_default()
            .insert(connection_id.to_string(), sender);
    }

    /// Remove a connection from its room; the room entry itself is dropped
    /// once the last member leaves. No departure message is sent.
    pub async fn leave(&self, room: &ProjectId, connection_id: &str) {
        let mut rooms = self.rooms.lock().await;
        if let Some(members) = rooms.get_mut(room.as_str()) {
            members.remove(connection_id);
            if members.is_empty() {
                rooms.remove(room.as_str());
            }
        }
    }

    /// Number of connections currently in the room.
    pub async fn member_count(&self, room: &ProjectId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(room.as_str()).map_or(0, HashMap::len)
    }

    /// Push `payload` to every member of the room except `exclude`.
    pub async fn send_to_others(&self, room: &ProjectId, exclude: &str, payload: &str) {
        let rooms = self.rooms.lock().await;
        if let Some(members) = rooms.get(room.as_str()) {
            for (connection_id, sender) in members {
                if connection_id != exclude && sender.send(payload.to_string()).is_err() {
                    tracing::warn!("failed to push message to connection '{connection_id}'");
                }
            }
        }
    }

    /// Push `payload` to every member of the room, sender included.
    ///
    /// Members who left since the payload was produced simply no longer
    /// appear here; the send targets whoever is in the room right now.
    pub async fn send_to_room(&self, room: &ProjectId, payload: &str) {
        let rooms = self.rooms.lock().await;
        if let Some(members) = rooms.get(room.as_str()) {
            for (connection_id, sender) in members {
                if sender.send(payload.to_string()).is_err() {
                    tracing::warn!("failed to push message to connection '{connection_id}'");
                }
            }
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectIdFactory;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_join_and_leave() {
        // given:
        let registry = RoomRegistry::new();
        let room = ProjectIdFactory::generate();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when:
        registry.join(&room, "conn-1", tx).await;

        // then:
        assert_eq!(registry.member_count(&room).await, 1);

        // when:
        registry.leave(&room, "conn-1").await;

        // then: empty room entry dropped
        assert_eq!(registry.member_count(&room).await, 0);
        assert!(registry.rooms.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_to_others_excludes_sender() {
        // given: three members in one room
        let registry = RoomRegistry::new();
        let room = ProjectIdFactory::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        registry.join(&room, "a", tx_a).await;
        registry.join(&room, "b", tx_b).await;
        registry.join(&room, "c", tx_c).await;

        // when: a broadcasts
        registry.send_to_others(&room, "a", "hello").await;

        // then: b and c each get exactly one copy, a gets none
        assert_eq!(rx_b.recv().await.unwrap(), "hello");
        assert_eq!(rx_c.recv().await.unwrap(), "hello");
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_to_room_includes_everyone() {
        // given:
        let registry = RoomRegistry::new();
        let room = ProjectIdFactory::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.join(&room, "a", tx_a).await;
        registry.join(&room, "b", tx_b).await;

        // when:
        registry.send_to_room(&room, "ai-reply").await;

        // then: full-room emit, sender included
        assert_eq!(rx_a.recv().await.unwrap(), "ai-reply");
        assert_eq!(rx_b.recv().await.unwrap(), "ai-reply");
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // given: two rooms
        let registry = RoomRegistry::new();
        let room1 = ProjectIdFactory::generate();
        let room2 = ProjectIdFactory::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.join(&room1, "a", tx_a).await;
        registry.join(&room2, "b", tx_b).await;

        // when: broadcast into room1
        registry.send_to_room(&room1, "only-room1").await;

        // then:
        assert_eq!(rx_a.recv().await.unwrap(), "only-room1");
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_to_departed_room_is_a_noop() {
        // given: everyone already left
        let registry = RoomRegistry::new();
        let room = ProjectIdFactory::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry.join(&room, "a", tx).await;
        registry.leave(&room, "a").await;

        // when / then: no panic, nothing delivered
        registry.send_to_room(&room, "late-ai-reply").await;
    }
}
