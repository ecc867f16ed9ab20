//! In-memory repository implementations.

pub mod project;
pub mod user;

pub use project::InMemoryProjectRepository;
pub use user::InMemoryUserRepository;
