//! Authentication infrastructure: signed tokens and the revocation store.

pub mod password;
pub mod revocation;
pub mod token;

pub use password::{digest_password, verify_password};
pub use revocation::{InMemoryRevocationStore, RevocationError, RevocationStore};
pub use token::{Claims, TOKEN_TTL_MILLIS, TokenError, TokenService};
