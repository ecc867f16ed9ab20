//! Minimal password digests.
//!
//! SHA-256 over the email (acting as salt) and the password. Enough for a
//! working login flow; a production deployment would swap in a dedicated
//! password-hashing scheme behind the same two functions.

use sha2::{Digest, Sha256};

/// Digest a password for storage, salted with the account email.
pub fn digest_password(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a presented password against a stored digest.
pub fn verify_password(email: &str, password: &str, stored_digest: &str) -> bool {
    digest_password(email, password) == stored_digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_roundtrip() {
        // given:
        let digest = digest_password("a@x.com", "secret1");

        // then:
        assert!(verify_password("a@x.com", "secret1", &digest));
        assert!(!verify_password("a@x.com", "wrong", &digest));
        // same password, different account, different digest
        assert_ne!(digest, digest_password("b@x.com", "secret1"));
    }
}
