//! Domain layer for the collaboration server.
//!
//! Business logic independent of data transfer objects (DTOs) and
//! infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{AI_TRIGGER, ChatPayload, FileTree, Project, ProjectSnapshot, Session, User};
pub use error::{FileTreeError, ValueObjectError};
pub use factory::ProjectIdFactory;
pub use repository::{ProjectRepository, RepositoryError, UserRepository};
pub use value_object::{Email, ProjectId};
