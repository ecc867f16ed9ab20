//! HTTP boundary error type.
//!
//! Maps the error taxonomy onto status codes and the structured JSON the
//! API speaks: validation failures carry an `errors` array with
//! field-level messages, everything else a `message` or `error` field.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error taxonomy at the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/invalid credential — 401 `{"error": ...}`
    #[error("unauthorized")]
    Authentication,

    /// Malformed request body — 400 `{"errors": [...]}`
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Unknown user/project reference — 404 `{"error": ...}`
    #[error("{0}")]
    NotFound(String),

    /// Acting user lacks project membership — 403 `{"message": ...}`
    #[error("{0}")]
    Authorization(String),

    /// AI collaborator or persistence failure — 502 `{"message": ...}`
    #[error("{0}")]
    Upstream(String),

    /// Anything else — 500 `{"error": ...}`
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Authentication => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            )
                .into_response(),
            Self::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({"errors": errors}))).into_response()
            }
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({"error": message}))).into_response()
            }
            Self::Authorization(message) => {
                (StatusCode::FORBIDDEN, Json(json!({"message": message}))).into_response()
            }
            Self::Upstream(message) => {
                (StatusCode::BAD_GATEWAY, Json(json!({"message": message}))).into_response()
            }
            Self::Internal(message) => {
                tracing::error!("internal error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "internal server error"})),
                )
                    .into_response()
            }
        }
    }
}
