//! CLI client for the Atelier collaboration server.
//!
//! Logs in over HTTP, joins a project room over WebSocket, and runs a
//! terminal REPL: chat (with the `@ai` trigger), local file edits with
//! debounced persistence, remote delta application, and a local run
//! sandbox with a preview address.

pub mod api;
pub mod error;
pub mod repl;
pub mod sandbox;
pub mod saver;
pub mod session;
pub mod sync;

pub use api::{ApiClient, CredentialStore};
pub use error::ClientError;
pub use sandbox::{ProcessSandbox, RunConfig};
pub use saver::DebouncedSaver;
pub use session::WsSession;
pub use sync::{PendingSave, SyncState};
