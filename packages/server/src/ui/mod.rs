//! UI layer: HTTP routes, the WebSocket endpoint, and server startup.

pub mod error;
pub mod extract;
pub mod handler;
pub mod runner;
mod signal;
pub mod state;

pub use runner::{ServerConfig, build_router, build_state, run};
