//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::{FileTree, Project};

/// Registration request body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `{user: {email, token}}` returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserDto {
    pub email: String,
    pub token: String,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub email: String,
}

/// `{user: {email}}` returned by the profile endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserDto,
}

/// Project creation request body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
}

/// Add-user request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub project_id: String,
    pub users: Vec<String>,
}

/// Whole-tree persistence request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileTreeRequest {
    pub project_id: String,
    pub file_tree: FileTree,
}

/// Public view of a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: String,
    pub name: String,
    pub users: Vec<String>,
    pub file_tree: FileTree,
}

impl From<&Project> for ProjectDto {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.as_str().to_string(),
            name: project.name.clone(),
            users: project
                .users
                .iter()
                .map(|u| u.as_str().to_string())
                .collect(),
            file_tree: project.file_tree.clone(),
        }
    }
}

/// `{message}` success envelope (logout and friends)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
