//! commit objects: immutable, content-hashed snapshots
//!
//! every mutation produces a whole-state snapshot of all tables, chained to
//! its parent by hash. The hash is computed over a canonical byte
//! serialization of the commit's content, so identical content always gets
//! the identical id and any alteration is detectable by recomputation.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::{Row, Schema};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{CommitHash, TableName};

/// hash a byte sequence to a 64-character lowercase hex string
///
/// the digest primitive is SHA-256; the rest of the crate only relies on it
/// being a 256-bit collision-resistant function.
pub fn digest(bytes: &[u8]) -> CommitHash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    CommitHash::from_digest(format!("{:x}", hasher.finalize()))
}

/// an immutable snapshot of every table at one point in history
///
/// built once through [`CommitBuilder`] with the hash computed last; all
/// fields are private and a later "amendment" is a brand-new commit whose
/// parent references this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    hash: CommitHash,
    parent: Option<CommitHash>,
    message: String,
    timestamp: i64,
    schemas: BTreeMap<TableName, Schema>,
    rows: BTreeMap<TableName, Vec<Row>>,
}

impl Commit {
    /// the content-derived id of this commit
    pub fn hash(&self) -> &CommitHash {
        &self.hash
    }

    /// the parent commit's hash, or None for the root
    pub fn parent(&self) -> Option<&CommitHash> {
        self.parent.as_ref()
    }

    /// the commit message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// integer timestamp (seconds since the epoch)
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// check if this is the root commit (no parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// names of all tables in this snapshot, in ascending order
    pub fn table_names(&self) -> impl Iterator<Item = &TableName> {
        self.schemas.keys()
    }

    /// check if a table exists in this snapshot
    pub fn has_table(&self, table: &TableName) -> bool {
        self.schemas.contains_key(table)
    }

    /// the schema of a table in this snapshot
    pub fn schema(&self, table: &TableName) -> Option<&Schema> {
        self.schemas.get(table)
    }

    /// the rows of a table in this snapshot, in stored order
    pub fn table_rows(&self, table: &TableName) -> Option<&[Row]> {
        self.rows.get(table).map(Vec::as_slice)
    }

    /// canonical byte serialization of this commit's content
    ///
    /// header lines, then for every table in ascending name order a
    /// `table:` line, a `schema:` line, and one `row:` line per row in
    /// stored (insertion) order. Table iteration is sorted for determinism;
    /// row order within a table is significant and not sorted.
    pub fn canonicalize(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str("parent:");
        if let Some(parent) = &self.parent {
            out.push_str(parent.as_str());
        }
        out.push('\n');
        out.push_str("message:");
        out.push_str(&self.message);
        out.push('\n');
        out.push_str("timestamp:");
        out.push_str(&self.timestamp.to_string());
        out.push('\n');

        for (name, schema) in &self.schemas {
            out.push_str("table:");
            out.push_str(name.as_str());
            out.push('\n');

            out.push_str("schema:");
            for (i, column) in schema.columns().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&column.to_string());
            }
            out.push('\n');

            if let Some(rows) = self.rows.get(name) {
                for row in rows {
                    out.push_str("row:");
                    for (i, value) in row.iter().enumerate() {
                        if i > 0 {
                            out.push(',');
                        }
                        out.push_str(&value.to_string());
                    }
                    out.push('\n');
                }
            }
        }

        out.into_bytes()
    }

    /// recompute this commit's content hash from scratch
    pub fn compute_hash(&self) -> CommitHash {
        digest(&self.canonicalize())
    }

    /// check that the stored hash matches the content
    ///
    /// false signals tampering or a canonicalization bug and must be
    /// treated as fatal by anything trusting this commit's history.
    pub fn is_valid(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// verify content addressing, returning a typed error on mismatch
    pub fn verify(&self) -> StorageResult<()> {
        let computed = self.compute_hash();
        if computed != self.hash {
            return Err(StorageError::HashMismatch {
                stored: self.hash.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// serialize to JSON for the persistence collaborator
    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// restore a commit from JSON, verifying content addressing before
    /// handing it out
    ///
    /// schema indexes are rebuilt by deserialization itself; rows are
    /// re-validated against their schemas so a hand-crafted payload cannot
    /// smuggle malformed rows behind a consistent hash.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let commit: Commit = serde_json::from_str(json)?;
        commit.verify()?;
        for (name, rows) in &commit.rows {
            let schema = commit
                .schemas
                .get(name)
                .ok_or_else(|| StorageError::InconsistentSnapshot(name.clone()))?;
            for row in rows {
                schema.validate_row(row).map_err(|source| StorageError::SchemaViolation {
                    table: name.clone(),
                    source,
                })?;
            }
        }
        Ok(commit)
    }
}

/// builder for creating commits with a fluent interface
///
/// rows are validated against their table's schema and the hash is
/// computed last, after every other field is in place.
pub struct CommitBuilder {
    parent: Option<CommitHash>,
    message: String,
    timestamp: Option<i64>,
    schemas: BTreeMap<TableName, Schema>,
    rows: BTreeMap<TableName, Vec<Row>>,
}

impl CommitBuilder {
    /// start building a root commit
    pub fn new() -> Self {
        Self {
            parent: None,
            message: String::new(),
            timestamp: None,
            schemas: BTreeMap::new(),
            rows: BTreeMap::new(),
        }
    }

    /// set the parent commit
    pub fn parent(mut self, parent: CommitHash) -> Self {
        self.parent = Some(parent);
        self
    }

    /// set the commit message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// set an explicit timestamp (defaults to now)
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// add a table's schema and rows to the snapshot
    pub fn table(mut self, name: TableName, schema: Schema, rows: Vec<Row>) -> Self {
        self.schemas.insert(name.clone(), schema);
        self.rows.insert(name, rows);
        self
    }

    /// validate the snapshot, compute the hash, and freeze the commit
    pub fn build(self) -> StorageResult<Commit> {
        for (name, rows) in &self.rows {
            let schema = self
                .schemas
                .get(name)
                .ok_or_else(|| StorageError::InconsistentSnapshot(name.clone()))?;
            for row in rows {
                schema.validate_row(row).map_err(|source| StorageError::SchemaViolation {
                    table: name.clone(),
                    source,
                })?;
            }
        }

        let mut commit = Commit {
            hash: digest(b""), // placeholder until content is final
            parent: self.parent,
            message: self.message,
            timestamp: self.timestamp.unwrap_or_else(|| Utc::now().timestamp()),
            schemas: self.schemas,
            rows: self.rows,
        };
        commit.hash = commit.compute_hash();
        Ok(commit)
    }
}

impl Default for CommitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
