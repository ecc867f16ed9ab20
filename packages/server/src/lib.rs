//! Atelier collaboration server.
//!
//! Authenticated users form projects, chat in a per-project room, edit a
//! synchronized in-memory file tree, and can pull an AI collaborator into
//! the conversation with an inline `@ai` trigger. Layered layout: domain,
//! usecase, infrastructure, ui.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub use ui::{ServerConfig, run};
