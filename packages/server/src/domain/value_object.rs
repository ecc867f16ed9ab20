//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Project identifier value object.
///
/// The backing store addresses projects by 24-character lowercase hex
/// strings; anything else is rejected before a lookup is even attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a new ProjectId.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::ProjectIdEmpty` for an empty string and
    /// `ValueObjectError::ProjectIdInvalidFormat` for anything that is not
    /// 24 lowercase hex characters.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ProjectIdEmpty);
        }
        let is_hex = id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if id.len() != 24 || !is_hex {
            return Err(ValueObjectError::ProjectIdInvalidFormat(id));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email value object.
///
/// The principal identifier for a user; the identity claim produced by the
/// credential verifier carries nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new Email.
    ///
    /// # Errors
    ///
    /// Returns a `ValueObjectError` when the string is empty, lacks an `@`,
    /// or exceeds 254 characters.
    pub fn new(email: String) -> Result<Self, ValueObjectError> {
        if email.is_empty() {
            return Err(ValueObjectError::EmailEmpty);
        }
        let len = email.len();
        if len > 254 {
            return Err(ValueObjectError::EmailTooLong {
                max: 254,
                actual: len,
            });
        }
        if !email.contains('@') {
            return Err(ValueObjectError::EmailInvalidFormat(email));
        }
        Ok(Self(email))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_new_success() {
        // given:
        let id = "64a1f0b2c3d4e5f60718293a".to_string();

        // when:
        let result = ProjectId::new(id);

        // then:
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "64a1f0b2c3d4e5f60718293a");
    }

    #[test]
    fn test_project_id_new_empty_fails() {
        // when:
        let result = ProjectId::new("".to_string());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::ProjectIdEmpty);
    }

    #[test]
    fn test_project_id_new_wrong_length_fails() {
        // given: 23 hex chars instead of 24
        let id = "64a1f0b2c3d4e5f60718293".to_string();

        // when:
        let result = ProjectId::new(id.clone());

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ProjectIdInvalidFormat(id)
        );
    }

    #[test]
    fn test_project_id_new_non_hex_fails() {
        // given: right length, wrong alphabet
        let id = "zzzzzzzzzzzzzzzzzzzzzzzz".to_string();

        // when:
        let result = ProjectId::new(id.clone());

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ProjectIdInvalidFormat(id)
        );
    }

    #[test]
    fn test_email_new_success() {
        // when:
        let result = Email::new("a@x.com".to_string());

        // then:
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "a@x.com");
    }

    #[test]
    fn test_email_new_empty_fails() {
        // when:
        let result = Email::new("".to_string());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::EmailEmpty);
    }

    #[test]
    fn test_email_new_without_at_fails() {
        // when:
        let result = Email::new("not-an-email".to_string());

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::EmailInvalidFormat("not-an-email".to_string())
        );
    }

    #[test]
    fn test_email_new_too_long_fails() {
        // given: 255 characters
        let email = format!("{}@x.com", "a".repeat(249));

        // when:
        let result = Email::new(email);

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::EmailTooLong {
                max: 254,
                actual: 255
            }
        );
    }

}
