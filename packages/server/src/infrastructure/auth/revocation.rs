//! Revocation store: revoked tokens with a time-to-live.
//!
//! Written once per logout, read on every subsequent HTTP authentication
//! attempt until the token's natural 24 h expiry makes the check moot.
//! The auth extractor treats a store error as a rejection (fail-closed);
//! treating "store unavailable" as "not revoked" would let a logged-out
//! token keep working.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use atelier_shared::time::now_millis;

use super::token::TOKEN_TTL_MILLIS;

/// Errors surfaced by revocation store implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RevocationError {
    /// The backing store could not be reached
    #[error("revocation store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store of revoked tokens with a fixed 24 h TTL.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `token` as revoked for the next 24 hours.
    async fn revoke(&self, token: &str) -> Result<(), RevocationError>;

    /// Whether `token` is currently revoked. Returns false after natural
    /// expiry without an explicit delete.
    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError>;
}

/// In-process revocation store.
///
/// Good for a single-process deployment; multi-process needs an external
/// KV store so every process sees the same revocation set.
pub struct InMemoryRevocationStore {
    entries: Mutex<HashMap<String, i64>>,
}

impl InMemoryRevocationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token: &str) -> Result<(), RevocationError> {
        let mut entries = self.entries.lock().await;
        entries.insert(token.to_string(), now_millis() + TOKEN_TTL_MILLIS);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError> {
        let mut entries = self.entries.lock().await;
        let now = now_millis();
        // lazy sweep keeps the map from growing without a background task
        entries.retain(|_, expires_at| *expires_at > now);
        Ok(entries.contains_key(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoke_then_is_revoked() {
        // given:
        let store = InMemoryRevocationStore::new();

        // when:
        store.revoke("token-1").await.unwrap();

        // then:
        assert!(store.is_revoked("token-1").await.unwrap());
        assert!(!store.is_revoked("token-2").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        // given:
        let store = InMemoryRevocationStore::new();

        // when: logout twice with the same token
        store.revoke("token-1").await.unwrap();
        store.revoke("token-1").await.unwrap();

        // then:
        assert!(store.is_revoked("token-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_entry_is_swept() {
        // given: an entry whose TTL has already passed
        let store = InMemoryRevocationStore::new();
        store
            .entries
            .lock()
            .await
            .insert("stale".to_string(), now_millis() - 1);

        // when / then: natural expiry, no explicit delete needed
        assert!(!store.is_revoked("stale").await.unwrap());
        assert!(store.entries.lock().await.is_empty());
    }
}
