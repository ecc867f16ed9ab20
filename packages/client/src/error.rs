//! Client-side error taxonomy.

use atelier_server::domain::FileTreeError;

/// Errors surfaced by the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered 401. The stored token has been cleared; the
    /// user must log in again.
    #[error("unauthorized: stored credentials cleared, log in again")]
    Unauthorized,

    /// Any other non-success HTTP response, with the server's message.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("websocket failure: {0}")]
    Websocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("file tree operation failed: {0}")]
    FileTree(#[from] FileTreeError),

    /// The server sent a frame the client does not understand.
    #[error("unexpected server payload: {0}")]
    Protocol(String),

    /// The run sandbox failed to mount, install, or reach readiness.
    #[error("sandbox failure: {0}")]
    Sandbox(String),
}
