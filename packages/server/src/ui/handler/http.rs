//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{Email, Project, ProjectId, ProjectIdFactory, RepositoryError, User},
    infrastructure::{
        auth::{digest_password, verify_password},
        dto::http::{
            AddUserRequest, AuthResponse, AuthUserDto, CreateProjectRequest, LoginRequest,
            MessageResponse, ProfileResponse, ProjectDto, RegisterRequest,
            UpdateFileTreeRequest, UserDto,
        },
    },
    ui::{
        error::{ApiError, FieldError},
        extract::AuthUser,
        state::AppState,
    },
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

fn validate_credentials(email: &str, password: &str) -> Result<Email, ApiError> {
    let mut errors = Vec::new();
    let email = match Email::new(email.to_string()) {
        Ok(email) => Some(email),
        Err(e) => {
            errors.push(FieldError::new("email", e.to_string()));
            None
        }
    };
    if password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "password must be at least 6 characters",
        ));
    }
    match email {
        Some(email) if errors.is_empty() => Ok(email),
        _ => Err(ApiError::Validation(errors)),
    }
}

/// `POST /users/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = validate_credentials(&body.email, &body.password)?;

    let digest = digest_password(email.as_str(), &body.password);
    state
        .users
        .create(User::new(email.clone(), digest))
        .await
        .map_err(|_| {
            ApiError::Validation(vec![FieldError::new("email", "email already registered")])
        })?;

    let token = state.tokens.issue(&email);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: AuthUserDto {
                email: email.into_string(),
                token,
            },
        }),
    ))
}

/// `POST /users/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = validate_credentials(&body.email, &body.password)?;

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|_| ApiError::NotFound("User not found".to_string()))?;

    if !verify_password(email.as_str(), &body.password, &user.password_digest) {
        return Err(ApiError::Authentication);
    }

    let token = state.tokens.issue(&email);
    Ok(Json(AuthResponse {
        user: AuthUserDto {
            email: email.into_string(),
            token,
        },
    }))
}

/// `GET /users/logout` — revokes the presented token for 24 h.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .revocations
        .revoke(&auth.token)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// `GET /users/profile`
pub async fn profile(auth: AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user: UserDto {
            email: auth.email.into_string(),
        },
    })
}

/// `GET /users/all` — everyone except the caller.
pub async fn all_users(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Json<Vec<UserDto>> {
    let users = state.users.all_except(&auth.email).await;
    Json(
        users
            .into_iter()
            .map(|u| UserDto {
                email: u.email.into_string(),
            })
            .collect(),
    )
}

/// `POST /projects/create`
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectDto>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "name",
            "name is required",
        )]));
    }

    let project = Project::new(ProjectIdFactory::generate(), body.name, auth.email);
    let dto = ProjectDto::from(&project);
    state
        .projects
        .create(project)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// `GET /projects/all` — the caller's projects.
pub async fn all_projects(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Json<Vec<ProjectDto>> {
    let projects = state.projects.all_for_member(&auth.email).await;
    Json(projects.iter().map(ProjectDto::from).collect())
}

fn parse_project_id(raw: &str) -> Result<ProjectId, ApiError> {
    ProjectId::new(raw.to_string()).map_err(|e| {
        ApiError::Validation(vec![FieldError::new("projectId", e.to_string())])
    })
}

/// `PUT /projects/add-user` — caller must already be a member.
pub async fn add_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<AddUserRequest>,
) -> Result<Json<ProjectDto>, ApiError> {
    let project_id = parse_project_id(&body.project_id)?;

    if body.users.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "users",
            "users must be a non-empty array",
        )]));
    }
    let mut users = Vec::with_capacity(body.users.len());
    for raw in body.users {
        users.push(Email::new(raw).map_err(|e| {
            ApiError::Validation(vec![FieldError::new("users", e.to_string())])
        })?);
    }

    let project = state
        .projects
        .get(&project_id)
        .await
        .map_err(|e| ApiError::NotFound(e.to_string()))?;
    if !project.is_member(&auth.email) {
        return Err(ApiError::Authorization(
            "User not authorized to add users in the project".to_string(),
        ));
    }

    let updated = state
        .projects
        .add_users(&project_id, users)
        .await
        .map_err(|e| ApiError::NotFound(e.to_string()))?;
    Ok(Json(ProjectDto::from(&updated)))
}

/// `GET /projects/all-project/{projectId}` — the live project, including
/// the file tree. This is the explicit re-fetch that refreshes a stale
/// connection-time snapshot.
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectDto>, ApiError> {
    let project_id = parse_project_id(&project_id)?;
    let project = state
        .projects
        .get(&project_id)
        .await
        .map_err(|e| ApiError::NotFound(e.to_string()))?;
    Ok(Json(ProjectDto::from(&project)))
}

/// `PUT /projects/update-file-tree` — whole-document overwrite; caller
/// must be a member.
pub async fn update_file_tree(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<UpdateFileTreeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let project_id = parse_project_id(&body.project_id)?;

    let project = state
        .projects
        .get(&project_id)
        .await
        .map_err(|e| ApiError::NotFound(e.to_string()))?;
    if !project.is_member(&auth.email) {
        return Err(ApiError::Authorization(
            "User not authorized to update the file tree".to_string(),
        ));
    }

    state
        .projects
        .update_file_tree(&project_id, body.file_tree)
        .await
        .map_err(|e| match e {
            RepositoryError::ProjectNotFound(_) => ApiError::NotFound(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        })?;
    Ok(Json(MessageResponse {
        message: "File tree updated".to_string(),
    }))
}
