//! UseCase: session handshake (the Session Gate).
//!
//! Authenticates a new transport-level connection before admitting it to a
//! project room. Validation order: project id present, project id
//! well-formed, credential present (auth field takes precedence over the
//! bearer header), credential verifies, project exists. On success the
//! resolved identity claim and a point-in-time project snapshot are
//! attached to the session and the connection joins its room.
//!
//! Deliberately NOT checked here: project membership (the gate loads the
//! project regardless of membership; HTTP mutations still enforce it) and
//! token revocation (a logged-out token can open sockets until natural
//! expiry — see DESIGN.md).

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{Email, ProjectId, ProjectRepository, Session},
    infrastructure::{auth::TokenService, registry::RoomRegistry},
};

use super::error::ConnectError;

/// Credentials and target project presented on a connection attempt.
#[derive(Debug, Clone, Default)]
pub struct HandshakeRequest {
    /// `projectId` query parameter
    pub project_id: Option<String>,
    /// Dedicated auth field (`token` query parameter); takes precedence
    pub auth_token: Option<String>,
    /// Token from an `Authorization: Bearer <token>` header
    pub bearer_token: Option<String>,
}

/// The Session Gate.
pub struct ConnectSessionUseCase {
    projects: Arc<dyn ProjectRepository>,
    tokens: Arc<TokenService>,
    registry: Arc<RoomRegistry>,
}

impl ConnectSessionUseCase {
    /// Create a new ConnectSessionUseCase.
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        tokens: Arc<TokenService>,
        registry: Arc<RoomRegistry>,
    ) -> Self {
        Self {
            projects,
            tokens,
            registry,
        }
    }

    /// Decide admit/reject for a proposed connection.
    ///
    /// On success the connection is registered in the room named after the
    /// project id and the resulting [`Session`] is returned.
    pub async fn execute(
        &self,
        request: HandshakeRequest,
        sender: UnboundedSender<String>,
    ) -> Result<Session, ConnectError> {
        let project_id_raw = request.project_id.ok_or(ConnectError::MissingProject)?;
        let project_id = ProjectId::new(project_id_raw.clone())
            .map_err(|_| ConnectError::InvalidProject(project_id_raw))?;

        let token = request
            .auth_token
            .or(request.bearer_token)
            .ok_or(ConnectError::MissingToken)?;
        let claims = self
            .tokens
            .verify(&token)
            .map_err(|_| ConnectError::InvalidToken)?;
        let email = Email::new(claims.email).map_err(|_| ConnectError::InvalidToken)?;

        // snapshot taken once, here; later project mutations by others are
        // not reflected into this session
        let project = self
            .projects
            .get(&project_id)
            .await
            .map_err(|_| ConnectError::ProjectNotFound(project_id.as_str().to_string()))?;
        let snapshot = project.snapshot();

        let connection_id = uuid::Uuid::new_v4().to_string();
        let session = Session::new(connection_id.clone(), email, snapshot);

        self.registry.join(&project_id, &connection_id, sender).await;

        tracing::info!(
            "session '{}' ({}) admitted to room '{}'",
            connection_id,
            session.email,
            project_id
        );
        Ok(session)
    }
}
