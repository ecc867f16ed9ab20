//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Object validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ProjectId validation error
    #[error("ProjectId cannot be empty")]
    ProjectIdEmpty,

    /// ProjectId is not a well-formed backing-store identifier
    #[error("ProjectId must be a 24-character lowercase hex string (got: {0})")]
    ProjectIdInvalidFormat(String),

    /// Email validation error
    #[error("Email cannot be empty")]
    EmailEmpty,

    /// Email missing the `@` separator
    #[error("Email must contain '@' (got: {0})")]
    EmailInvalidFormat(String),

    /// Email too long error
    #[error("Email cannot exceed {max} characters (got {actual})")]
    EmailTooLong { max: usize, actual: usize },
}

/// Errors related to file-tree operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileTreeError {
    /// A path was empty or contained an empty segment
    #[error("file path cannot be empty or contain empty segments (got: {0:?})")]
    InvalidPath(String),

    /// The path resolves to a directory where a file was expected
    #[error("path is a directory, not a file: {0}")]
    NotAFile(String),

    /// An intermediate path segment resolves to a file, not a directory
    #[error("path segment is a file, not a directory: {0}")]
    NotADirectory(String),

    /// The path does not exist in the tree
    #[error("no entry at path: {0}")]
    NotFound(String),
}
