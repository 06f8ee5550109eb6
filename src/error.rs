//! Error types for SpliceHash
//!
//! This module defines all error types used throughout the application.
//! The taxonomy distinguishes user-fixable misconfiguration (unknown
//! algorithm, name too long) from kernel-level facility gaps and from
//! transfer integrity violations, so each failure carries an actionable
//! message.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SpliceHash operations
#[derive(Error, Debug)]
pub enum SpliceHashError {
    /// Wrong command-line usage
    #[error("usage: splicehash <ALGORITHM> <FILE> (see --help)")]
    Usage,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Algorithm name does not fit the kernel's fixed-size name field
    #[error("algorithm name '{name}' too long: {len} bytes, limit {max} including the terminator")]
    AlgorithmNameTooLong {
        /// Offending algorithm name
        name: String,
        /// Its length in bytes
        len: usize,
        /// Capacity of the kernel name field, terminator included
        max: usize,
    },

    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path the operation failed on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input is not a regular file
    #[error("'{path}' is not a regular file ({file_type})")]
    NotARegularFile {
        /// Rejected path
        path: PathBuf,
        /// Human-readable description of what it actually is
        file_type: &'static str,
    },

    /// Running kernel lacks the crypto user API
    #[error("kernel AF_ALG support missing; CONFIG_CRYPTO_USER_API_HASH is required")]
    FacilityUnavailable,

    /// Algorithm is not registered with the hashing backend
    #[error("hash algorithm '{name}' not found; see /proc/crypto for the kernel's list")]
    AlgorithmNotFound {
        /// Requested algorithm name
        name: String,
    },

    /// Generic session setup failure (socket/bind/accept)
    #[error("AF_ALG {operation} failed: {source}")]
    Session {
        /// Which setup step failed
        operation: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Splice pipe could not be created
    #[error("pipe creation failed: {source}")]
    Conduit {
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A transfer leg failed outright
    #[error("transfer failed during {stage}: {source}")]
    TransferFailed {
        /// Pipeline stage that failed
        stage: &'static str,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A transfer leg moved an unexpected number of bytes
    #[error("transfer integrity violation during {stage}: moved {actual} bytes, expected {expected}")]
    TransferIntegrity {
        /// Pipeline stage the violation occurred in
        stage: &'static str,
        /// Byte count the stage was asked to move
        expected: u64,
        /// Byte count actually moved
        actual: u64,
    },

    /// Digest retrieval from the session failed
    #[error("digest read failed: {source}")]
    SessionRead {
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Report serialization failure
    #[error("report serialization failed: {0}")]
    Report(String),
}

impl SpliceHashError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a session setup error
    pub fn session(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Session {
            operation: operation.into(),
            source,
        }
    }

    /// Create a transfer failure for the given pipeline stage
    pub fn transfer_failed(stage: &'static str, source: std::io::Error) -> Self {
        Self::TransferFailed { stage, source }
    }

    /// Check if this error is something the user can fix by changing
    /// arguments rather than their system
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::Usage
                | Self::Config(_)
                | Self::AlgorithmNameTooLong { .. }
                | Self::AlgorithmNotFound { .. }
        )
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotARegularFile { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for SpliceHash operations
pub type Result<T> = std::result::Result<T, SpliceHashError>;

impl From<serde_json::Error> for SpliceHashError {
    fn from(err: serde_json::Error) -> Self {
        SpliceHashError::Report(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SpliceHashError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SpliceHashError::io("/test/path", io_err);
        assert!(err.path().is_some());
        assert_eq!(err.path().unwrap(), &PathBuf::from("/test/path"));
    }

    #[test]
    fn test_misconfiguration_category() {
        let err = SpliceHashError::AlgorithmNotFound {
            name: "not-a-real-hash".to_string(),
        };
        assert!(err.is_misconfiguration());
        assert!(err.to_string().contains("not-a-real-hash"));

        let err = SpliceHashError::FacilityUnavailable;
        assert!(!err.is_misconfiguration());
        assert!(err.to_string().contains("CONFIG_CRYPTO_USER_API_HASH"));
    }

    #[test]
    fn test_integrity_message_carries_counts() {
        let err = SpliceHashError::TransferIntegrity {
            stage: "pipe to session",
            expected: 4096,
            actual: 1024,
        };
        let message = err.to_string();
        assert!(message.contains("4096"));
        assert!(message.contains("1024"));
        assert!(message.contains("pipe to session"));
    }

    #[test]
    fn test_with_path_extension() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = result.with_path("/some/file").unwrap_err();
        assert_eq!(err.path().unwrap(), &PathBuf::from("/some/file"));
    }
}
