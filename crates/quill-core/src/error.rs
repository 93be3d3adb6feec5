//! Error handling for the content store
//!
//! Provides typed errors for node, edge, and index operations. I/O failures
//! are classified by kind so callers can tell a permissions problem from a
//! full disk.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the content store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No node of any kind matches the id or slug
    #[error("No node found for '{id}'")]
    NodeNotFound { id: String },

    /// Style name outside the fixed enumeration
    #[error("Invalid style '{name}'. Allowed: chapter, blog, post, snippet, tweet")]
    InvalidStyle { name: String },

    /// Relation type outside the fixed enumeration
    #[error("Invalid relation type '{name}'. Allowed: snippet_of, related_to")]
    InvalidRelation { name: String },

    /// Failed to create a data directory
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File contents are not the JSON we expect
    #[error("Invalid JSON in '{path}': {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => StoreError::ReadError {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => StoreError::DiskFull {
                path,
                source: error,
            },
            _ => StoreError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Whether this error was raised by input validation rather than storage
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidStyle { .. } | StoreError::InvalidRelation { .. }
        )
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StoreError::from_io(io_err, PathBuf::from("/test/path"));

        assert!(matches!(err, StoreError::PermissionDenied { .. }));
        assert!(err.to_string().contains("/test/path"));
    }

    #[test]
    fn test_disk_full_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StoreError::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, StoreError::DiskFull { .. }));
    }

    #[test]
    fn test_validation_errors() {
        let err = StoreError::InvalidStyle {
            name: "sonnet".to_string(),
        };
        assert!(err.is_validation());
        assert!(err.to_string().contains("sonnet"));

        let err = StoreError::InvalidRelation {
            name: "bogus".to_string(),
        };
        assert!(err.is_validation());

        let err = StoreError::NodeNotFound {
            id: "missing".to_string(),
        };
        assert!(!err.is_validation());
    }
}
