//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including timestamp parsing and name/path validation failures.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A modification timestamp could not be parsed or normalized
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A file name is empty or contains a path separator
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// Invalid remote directory prefix
    #[error("Invalid remote directory: {0}")]
    InvalidRemoteDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidTimestamp("yesterday".to_string());
        assert_eq!(err.to_string(), "Invalid timestamp: yesterday");

        let err = DomainError::InvalidFileName("a/b".to_string());
        assert_eq!(err.to_string(), "Invalid file name: a/b");

        let err = DomainError::InvalidRemoteDir(String::new());
        assert_eq!(err.to_string(), "Invalid remote directory: ");
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::InvalidFileName("x".to_string());
        let err2 = DomainError::InvalidFileName("x".to_string());
        let err3 = DomainError::InvalidFileName("y".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
