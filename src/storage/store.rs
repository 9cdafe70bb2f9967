//! in-memory commit store: the hash → commit mapping
//!
//! commits are append-only and immutable after construction, so concurrent
//! reads need no coordination beyond the map lock. This store implements
//! the same contract a persistence backend must provide: `put`, `get`,
//! `contains`, keyed by the hashes this crate manufactures.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::storage::commit::Commit;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::CommitHash;

/// thread-safe store of commits, addressed by content hash
///
/// clone this to share across threads - it uses Arc internally.
#[derive(Clone, Default)]
pub struct CommitStore {
    inner: Arc<RwLock<HashMap<CommitHash, Commit>>>,
}

impl CommitStore {
    /// create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// store a commit, verifying its content hash first
    ///
    /// storing the same commit twice is a no-op (content addressing makes
    /// the second copy identical by construction).
    pub fn put(&self, commit: Commit) -> StorageResult<CommitHash> {
        commit.verify()?;
        let hash = commit.hash().clone();
        self.inner.write().insert(hash.clone(), commit);
        Ok(hash)
    }

    /// fetch a commit by hash
    pub fn get(&self, hash: &CommitHash) -> StorageResult<Commit> {
        self.inner
            .read()
            .get(hash)
            .cloned()
            .ok_or_else(|| StorageError::CommitNotFound(hash.clone()))
    }

    /// fetch a commit and re-verify its content addressing
    ///
    /// use this when the commit may have come from an untrusted backend.
    pub fn get_verified(&self, hash: &CommitHash) -> StorageResult<Commit> {
        let commit = self.get(hash)?;
        commit.verify()?;
        Ok(commit)
    }

    /// check if a commit exists
    pub fn contains(&self, hash: &CommitHash) -> bool {
        self.inner.read().contains_key(hash)
    }

    /// number of stored commits
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// walk the parent chain from a leaf to the root, newest first
    ///
    /// every commit on the chain is verified along the way. Callers own
    /// chain well-formedness, but a revisited hash is reported as
    /// corruption instead of looping forever.
    pub fn history(&self, leaf: &CommitHash) -> StorageResult<Vec<Commit>> {
        let mut commits = Vec::new();
        let mut seen: HashSet<CommitHash> = HashSet::new();
        let mut cursor = Some(leaf.clone());

        while let Some(hash) = cursor {
            if !seen.insert(hash.clone()) {
                return Err(StorageError::CorruptedHistory(hash));
            }
            let commit = self.get_verified(&hash)?;
            cursor = commit.parent().cloned();
            commits.push(commit);
        }

        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColumnDef, DataType, SchemaBuilder, Value};
    use crate::storage::commit::CommitBuilder;
    use crate::storage::types::TableName;

    fn commit_chain(store: &CommitStore, len: usize) -> Vec<CommitHash> {
        let schema = SchemaBuilder::new("events")
            .column(ColumnDef::new("id", DataType::Integer).primary_key())
            .build()
            .unwrap();
        let table = TableName::new("events").unwrap();

        let mut hashes = Vec::new();
        let mut parent: Option<CommitHash> = None;
        for i in 0..len {
            let mut builder = CommitBuilder::new()
                .message(format!("commit {}", i))
                .timestamp(1700000000 + i as i64)
                .table(
                    table.clone(),
                    schema.clone(),
                    (0..=i).map(|n| vec![Value::Integer(n as i64)]).collect(),
                );
            if let Some(p) = &parent {
                builder = builder.parent(p.clone());
            }
            let commit = builder.build().unwrap();
            parent = Some(commit.hash().clone());
            hashes.push(store.put(commit).unwrap());
        }
        hashes
    }

    #[test]
    fn test_put_and_get() {
        let store = CommitStore::new();
        let hashes = commit_chain(&store, 1);

        let commit = store.get(&hashes[0]).unwrap();
        assert_eq!(commit.hash(), &hashes[0]);
        assert!(store.contains(&hashes[0]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_unknown_hash() {
        let store = CommitStore::new();
        let missing = CommitHash::from_hex("d".repeat(64)).unwrap();
        assert!(matches!(
            store.get(&missing),
            Err(StorageError::CommitNotFound(_))
        ));
    }

    #[test]
    fn test_history_newest_first() {
        let store = CommitStore::new();
        let hashes = commit_chain(&store, 3);

        let history = store.history(&hashes[2]).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].hash(), &hashes[2]);
        assert_eq!(history[1].hash(), &hashes[1]);
        assert_eq!(history[2].hash(), &hashes[0]);
        assert!(history[2].is_root());
    }

    #[test]
    fn test_history_missing_parent() {
        let store = CommitStore::new();
        let dangling = CommitHash::from_hex("e".repeat(64)).unwrap();
        let commit = CommitBuilder::new()
            .parent(dangling)
            .message("orphan")
            .timestamp(1700000000)
            .build()
            .unwrap();
        let leaf = store.put(commit).unwrap();

        assert!(matches!(
            store.history(&leaf),
            Err(StorageError::CommitNotFound(_))
        ));
    }

    #[test]
    fn test_put_rejects_tampered_commit() {
        let store = CommitStore::new();
        let commit = CommitBuilder::new()
            .message("honest")
            .timestamp(1700000000)
            .build()
            .unwrap();

        // smuggle a different body under the same hash via JSON editing
        let json = commit.to_json().unwrap();
        let tampered = json.replace("honest", "forged!");
        let parsed: Result<Commit, _> = Commit::from_json(&tampered);
        assert!(parsed.is_err());

        // and an honest commit is accepted
        assert!(store.put(commit).is_ok());
    }

    #[test]
    fn test_store_shared_across_clones() {
        let store = CommitStore::new();
        let handle = store.clone();
        let hashes = commit_chain(&store, 2);
        assert!(handle.contains(&hashes[1]));
        assert_eq!(handle.len(), 2);
    }
}
