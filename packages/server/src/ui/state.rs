//! Server state and connection query types.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    domain::{ProjectRepository, UserRepository},
    infrastructure::{
        ai::AiCollaborator,
        auth::{RevocationStore, TokenService},
        registry::RoomRegistry,
    },
};

/// Query parameters for a WebSocket connection attempt.
///
/// Everything is optional here; the Session Gate decides what is missing
/// and rejects with a precise reason instead of a generic 400.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Target project (the room to join)
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
    /// Dedicated auth field; takes precedence over the bearer header
    pub token: Option<String>,
}

/// Shared application state.
pub struct AppState {
    /// User account storage
    pub users: Arc<dyn UserRepository>,
    /// Project storage (members + file tree)
    pub projects: Arc<dyn ProjectRepository>,
    /// Revoked-token store consulted by the HTTP auth extractor
    pub revocations: Arc<dyn RevocationStore>,
    /// Room membership map owned by the message router
    pub registry: Arc<RoomRegistry>,
    /// Token issue/verify service
    pub tokens: Arc<TokenService>,
    /// The AI collaborator invoked on triggered chat messages
    pub ai: Arc<dyn AiCollaborator>,
}
