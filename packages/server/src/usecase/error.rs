//! UseCase layer error definitions.

use thiserror::Error;

/// Handshake failures. Each one terminates the connection attempt with a
/// reason string; the connection is never admitted to a room.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// No project id was supplied on the connection attempt
    #[error("missing project id")]
    MissingProject,

    /// The project id is not a well-formed backing-store identifier
    #[error("invalid project id: {0}")]
    InvalidProject(String),

    /// No credential was presented in either the auth field or the bearer
    /// header
    #[error("missing token")]
    MissingToken,

    /// The credential did not verify (bad signature, malformed, expired)
    #[error("invalid token")]
    InvalidToken,

    /// The project id was well-formed but no such project exists
    #[error("project not found: {0}")]
    ProjectNotFound(String),
}

/// In-room routing failures.
#[derive(Debug, Error)]
pub enum RouteMessageError {
    /// The AI collaborator call failed
    #[error("AI collaborator failed: {0}")]
    AiUpstream(String),
}
