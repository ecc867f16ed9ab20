//! Repository traits — the domain's view of the data access layer.
//!
//! The UseCase layer depends on these traits; concrete implementations live
//! in the infrastructure layer (dependency inversion).

use async_trait::async_trait;
use thiserror::Error;

use super::{
    entity::{FileTree, Project, User},
    value_object::{Email, ProjectId},
};

/// Errors surfaced by repository implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No user registered under the given email
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// A user with the given email already exists
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// No project stored under the given id
    #[error("project not found: {0}")]
    ProjectNotFound(String),
}

/// Data access for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Fails when the email is already registered.
    async fn create(&self, user: User) -> Result<(), RepositoryError>;

    /// Look up a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError>;

    /// All registered users except `excluding`.
    async fn all_except(&self, excluding: &Email) -> Vec<User>;
}

/// Data access for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Store a new project.
    async fn create(&self, project: Project) -> Result<(), RepositoryError>;

    /// Load a project by id.
    async fn get(&self, id: &ProjectId) -> Result<Project, RepositoryError>;

    /// All projects `member` belongs to.
    async fn all_for_member(&self, member: &Email) -> Vec<Project>;

    /// Add users to a project's member set and return the updated project.
    async fn add_users(
        &self,
        id: &ProjectId,
        users: Vec<Email>,
    ) -> Result<Project, RepositoryError>;

    /// Overwrite the whole file-tree document of a project.
    ///
    /// Last writer wins at document granularity; two members flushing
    /// concurrently can clobber each other's unrelated-file changes.
    async fn update_file_tree(
        &self,
        id: &ProjectId,
        file_tree: FileTree,
    ) -> Result<(), RepositoryError>;
}
