//! Credential verifier: compact signed bearer tokens.
//!
//! Tokens are `base64url(claims_json) + "." + base64url(digest)` where the
//! digest is SHA-256 over the server secret and the encoded claims. The
//! verifier yields an identity claim carrying only the principal's email;
//! authorization is reduced to project membership checks elsewhere.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use atelier_shared::time::now_millis;

use crate::domain::Email;

/// Token lifetime: 24 hours, in milliseconds.
pub const TOKEN_TTL_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Errors produced while verifying a token
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token is not two base64url sections joined by a dot, or the claims
    /// are not valid JSON
    #[error("malformed token")]
    Malformed,

    /// The signature does not match the claims
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token's expiry has passed
    #[error("token expired")]
    Expired,
}

/// The identity claim carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier
    pub email: String,
    /// Issued-at, Unix milliseconds
    pub iat: i64,
    /// Expiry, Unix milliseconds
    pub exp: i64,
}

/// Issues and verifies signed bearer tokens with a process-wide secret.
pub struct TokenService {
    secret: String,
}

impl TokenService {
    /// Create a token service with the given signing secret.
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issue a token for `email`, valid for 24 hours.
    pub fn issue(&self, email: &Email) -> String {
        self.issue_at(email, now_millis())
    }

    /// Issue a token with an explicit issued-at timestamp.
    pub fn issue_at(&self, email: &Email, iat: i64) -> String {
        let claims = Claims {
            email: email.as_str().to_string(),
            iat,
            exp: iat + TOKEN_TTL_MILLIS,
        };
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&claims).expect("claims serialization cannot fail"),
        );
        let signature = self.sign(&payload);
        format!("{payload}.{signature}")
    }

    /// Verify a token: format, signature, then expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        if signature.contains('.') {
            return Err(TokenError::Malformed);
        }
        if self.sign(payload) != signature {
            return Err(TokenError::InvalidSignature);
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;
        if claims.exp <= now_millis() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b".");
        hasher.update(payload.as_bytes());
        hex::encode(hasher.finalize())
    }
}
