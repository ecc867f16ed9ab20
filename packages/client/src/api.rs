//! HTTP client for the collaboration server API.
//!
//! The bearer token lives in a [`CredentialStore`], a single fixed key in
//! a state file. Every authenticated call attaches
//! `Authorization: Bearer <token>`; any 401 clears the stored token and
//! surfaces [`ClientError::Unauthorized`] so the caller re-logs-in,
//! regardless of which endpoint produced it.

use std::path::PathBuf;

use reqwest::{RequestBuilder, Response, StatusCode};

use atelier_server::domain::FileTree;
use atelier_server::infrastructure::dto::http::{
    AuthResponse, MessageResponse, ProfileResponse, ProjectDto, UpdateFileTreeRequest, UserDto,
};

use crate::error::ClientError;

/// Persistent storage for the single bearer token.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$HOME/.atelier/token`, falling back to the system temp directory
    /// when no home is set.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
            .join(".atelier")
            .join("token")
    }

    /// The stored token, if any.
    pub fn load(&self) -> Option<String> {
        let token = std::fs::read_to_string(&self.path).ok()?;
        let token = token.trim().to_string();
        (!token.is_empty()).then_some(token)
    }

    pub fn store(&self, token: &str) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
    }

    /// Remove the stored token. Missing file is not an error.
    pub fn clear(&self) -> Result<(), std::io::Error> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Typed client over the server's HTTP API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, credentials: CredentialStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    /// The currently stored token, if any.
    pub fn token(&self) -> Option<String> {
        self.credentials.load()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the stored bearer token, failing up front when there is
    /// none.
    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.credentials.load().ok_or(ClientError::Unauthorized)?;
        Ok(builder.bearer_auth(token))
    }

    /// Map non-success responses to the client error taxonomy. A 401
    /// clears the stored credentials as a side effect.
    async fn check(&self, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.credentials.clear() {
                tracing::warn!("failed to clear stored token: {e}");
            }
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }
        Ok(response)
    }

    /// Register a new account and store the issued token.
    pub async fn register(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("/users/register"))
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        let auth: AuthResponse = self.check(response).await?.json().await?;
        self.credentials.store(&auth.user.token)?;
        Ok(auth.user.token)
    }

    /// Log in and store the issued token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("/users/login"))
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        let auth: AuthResponse = self.check(response).await?.json().await?;
        self.credentials.store(&auth.user.token)?;
        Ok(auth.user.token)
    }

    /// Revoke the current token server-side, then drop it locally.
    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        let request = self.authed(self.http.get(self.url("/users/logout")))?;
        let response = self.check(request.send().await?).await?;
        let message = response.json().await?;
        self.credentials.clear()?;
        Ok(message)
    }

    pub async fn profile(&self) -> Result<UserDto, ClientError> {
        let request = self.authed(self.http.get(self.url("/users/profile")))?;
        let response: ProfileResponse = self.check(request.send().await?).await?.json().await?;
        Ok(response.user)
    }

    /// Every other registered user.
    pub async fn all_users(&self) -> Result<Vec<UserDto>, ClientError> {
        let request = self.authed(self.http.get(self.url("/users/all")))?;
        Ok(self.check(request.send().await?).await?.json().await?)
    }

    pub async fn create_project(&self, name: &str) -> Result<ProjectDto, ClientError> {
        let request = self
            .authed(self.http.post(self.url("/projects/create")))?
            .json(&serde_json::json!({"name": name}));
        Ok(self.check(request.send().await?).await?.json().await?)
    }

    pub async fn all_projects(&self) -> Result<Vec<ProjectDto>, ClientError> {
        let request = self.authed(self.http.get(self.url("/projects/all")))?;
        Ok(self.check(request.send().await?).await?.json().await?)
    }

    pub async fn get_project(&self, project_id: &str) -> Result<ProjectDto, ClientError> {
        let request = self.authed(
            self.http
                .get(self.url(&format!("/projects/all-project/{project_id}"))),
        )?;
        Ok(self.check(request.send().await?).await?.json().await?)
    }

    /// Add members to a project. Rejected with 403 unless the caller is a
    /// member.
    pub async fn add_user(
        &self,
        project_id: &str,
        users: &[String],
    ) -> Result<ProjectDto, ClientError> {
        let request = self
            .authed(self.http.put(self.url("/projects/add-user")))?
            .json(&serde_json::json!({"projectId": project_id, "users": users}));
        Ok(self.check(request.send().await?).await?.json().await?)
    }

    /// Persist the whole tree document (last writer wins).
    pub async fn update_file_tree(
        &self,
        project_id: &str,
        file_tree: &FileTree,
    ) -> Result<(), ClientError> {
        let body = UpdateFileTreeRequest {
            project_id: project_id.to_string(),
            file_tree: file_tree.clone(),
        };
        let request = self
            .authed(self.http.put(self.url("/projects/update-file-tree")))?
            .json(&body);
        self.check(request.send().await?).await?;
        Ok(())
    }
}

/// Pull a human-readable message out of a structured error body:
/// `{"error"}`, `{"message"}`, or a validation `{"errors":[{field,message}]}`
/// array. Falls back to the raw body.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    if let Some(message) = value["error"].as_str().or(value["message"].as_str()) {
        return message.to_string();
    }
    if let Some(errors) = value["errors"].as_array() {
        let parts: Vec<String> = errors
            .iter()
            .filter_map(|e| {
                let field = e["field"].as_str()?;
                let message = e["message"].as_str()?;
                Some(format!("{field}: {message}"))
            })
            .collect();
        if !parts.is_empty() {
            return parts.join("; ");
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_store_roundtrip() {
        // given:
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested").join("token"));
        assert_eq!(store.load(), None);

        // when:
        store.store("tok-123").unwrap();

        // then:
        assert_eq!(store.load(), Some("tok-123".to_string()));

        // when: cleared twice
        store.clear().unwrap();
        store.clear().unwrap();

        // then: idempotent, token gone
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_credential_store_ignores_blank_file() {
        // given:
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("token"));
        store.store("  \n").unwrap();

        // then:
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_extract_error_message_variants() {
        // single-field envelopes
        assert_eq!(extract_error_message(r#"{"error":"Unauthorized"}"#), "Unauthorized");
        assert_eq!(extract_error_message(r#"{"message":"not a member"}"#), "not a member");

        // validation array
        let body = r#"{"errors":[{"field":"email","message":"invalid"},{"field":"password","message":"too short"}]}"#;
        assert_eq!(
            extract_error_message(body),
            "email: invalid; password: too short"
        );

        // unstructured fallback
        assert_eq!(extract_error_message("gateway timeout"), "gateway timeout");
    }
}
