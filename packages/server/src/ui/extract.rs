//! Authenticated-user extractor for HTTP handlers.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use crate::domain::Email;

use super::{error::ApiError, state::AppState};

/// Identity resolved from the `Authorization: Bearer <token>` header.
///
/// Consults the revocation store before trusting the token; a store error
/// rejects the request (fail-closed — treating "store unavailable" as
/// "not revoked" would let logged-out tokens keep working).
pub struct AuthUser {
    /// Verified principal
    pub email: Email,
    /// The raw token as presented (needed by logout to revoke it)
    pub token: String,
}

/// Pull the bearer token out of an `Authorization` header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    value.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::Authentication)?
            .to_string();

        let revoked = state
            .revocations
            .is_revoked(&token)
            .await
            .map_err(|e| {
                tracing::error!("revocation store unavailable, rejecting request: {e}");
                ApiError::Authentication
            })?;
        if revoked {
            return Err(ApiError::Authentication);
        }

        let claims = state
            .tokens
            .verify(&token)
            .map_err(|_| ApiError::Authentication)?;
        let email = Email::new(claims.email).map_err(|_| ApiError::Authentication)?;

        Ok(AuthUser { email, token })
    }
}
