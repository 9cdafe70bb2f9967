//! storage layer error types
//!
//! all errors that can occur while working with commits and branches are
//! defined here, using `thiserror` for ergonomic definitions.

use thiserror::Error;

use crate::catalog::SchemaError;
use crate::storage::types::{BranchName, CommitHash, InvalidNameError, TableName};

/// the main error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// the commit's stored hash does not match its recomputed content hash.
    /// this means tampering or a canonicalization bug; any history that
    /// reaches this commit must be treated as untrusted.
    #[error("hash mismatch for commit {stored}: content hashes to {computed}")]
    HashMismatch { stored: CommitHash, computed: CommitHash },

    /// the requested commit was not found
    #[error("commit not found: {0}")]
    CommitNotFound(CommitHash),

    /// the specified branch was not found
    #[error("branch not found: {0}")]
    BranchNotFound(BranchName),

    /// branch already exists
    #[error("branch already exists: {0}")]
    BranchAlreadyExists(BranchName),

    /// branch update failed because another writer advanced it first
    #[error("concurrent modification: branch {branch} no longer points at {expected}")]
    ConcurrentModification { branch: BranchName, expected: CommitHash },

    /// a table snapshot has a schema entry without row data, or vice versa
    #[error("table {0} has mismatched schema and row entries")]
    InconsistentSnapshot(TableName),

    /// a row failed validation against its table's schema
    #[error("schema violation in table {table}: {source}")]
    SchemaViolation {
        table: TableName,
        #[source]
        source: SchemaError,
    },

    /// invalid name or identifier
    #[error("invalid name: {0}")]
    InvalidName(#[from] InvalidNameError),

    /// the parent chain revisited a commit, which cannot happen in a
    /// well-formed content-addressed history
    #[error("corrupted history: commit {0} reachable from itself")]
    CorruptedHistory(CommitHash),

    /// JSON serialization or deserialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// check if this error indicates the resource doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::CommitNotFound(_) | StorageError::BranchNotFound(_)
        )
    }

    /// check if this error is a conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::BranchAlreadyExists(_) | StorageError::ConcurrentModification { .. }
        )
    }

    /// check if this error is recoverable by retry
    pub fn is_retriable(&self) -> bool {
        matches!(self, StorageError::ConcurrentModification { .. })
    }

    /// check if this error means the history cannot be trusted
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            StorageError::HashMismatch { .. } | StorageError::CorruptedHistory(_)
        )
    }
}

/// result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let not_found = StorageError::BranchNotFound(BranchName::main());
        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());

        let conflict = StorageError::BranchAlreadyExists(BranchName::main());
        assert!(conflict.is_conflict());
        assert!(!conflict.is_retriable());

        let hash = CommitHash::from_hex("0".repeat(64)).unwrap();
        let mismatch = StorageError::HashMismatch {
            stored: hash.clone(),
            computed: CommitHash::from_hex("f".repeat(64)).unwrap(),
        };
        assert!(mismatch.is_integrity_failure());
        assert!(!mismatch.is_not_found());

        let cas = StorageError::ConcurrentModification {
            branch: BranchName::main(),
            expected: hash,
        };
        assert!(cas.is_retriable());
        assert!(cas.is_conflict());
    }
}
