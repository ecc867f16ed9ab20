//! Domain factories for creating domain entities and value objects.

use super::ProjectId;

/// Factory for generating ProjectId instances.
///
/// Encapsulates identifier generation, separate from the validation logic
/// in ProjectId itself.
pub struct ProjectIdFactory;

impl ProjectIdFactory {
    /// Generate a new ProjectId.
    ///
    /// Takes the first 24 hex characters of a UUID v4, which matches the
    /// backing store's identifier format.
    pub fn generate() -> ProjectId {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        ProjectId::new(hex[..24].to_string())
            .expect("a truncated uuid simple form is always 24 lowercase hex chars")
    }
}
