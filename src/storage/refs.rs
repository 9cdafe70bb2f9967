//! branch registry: mutable name → commit-hash pointers
//!
//! branches are the only mutable entity in the model. A branch is bound to
//! exactly one commit hash at a time; advancing it is a fast-forward with
//! no ancestry check (forced vs non-forced semantics are the caller's
//! decision). Updates go through a registry-wide lock, and the
//! compare-and-swap variant protects racing writers from lost updates.
//!
//! The registry stores pointers into the commit hash space but never
//! inspects commit contents.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{BranchName, CommitHash};

/// thread-safe registry of branch pointers
///
/// clone this to share across threads - it uses Arc internally.
#[derive(Clone, Default)]
pub struct BranchRegistry {
    inner: Arc<RwLock<HashMap<BranchName, CommitHash>>>,
}

impl BranchRegistry {
    /// create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// create a new branch pointing at the given commit hash
    pub fn create(&self, branch: &BranchName, target: CommitHash) -> StorageResult<()> {
        let mut branches = self.inner.write();
        if branches.contains_key(branch) {
            return Err(StorageError::BranchAlreadyExists(branch.clone()));
        }
        branches.insert(branch.clone(), target);
        Ok(())
    }

    /// resolve a branch name to its current commit hash
    pub fn resolve(&self, branch: &BranchName) -> StorageResult<CommitHash> {
        self.inner
            .read()
            .get(branch)
            .cloned()
            .ok_or_else(|| StorageError::BranchNotFound(branch.clone()))
    }

    /// check if a branch exists
    pub fn exists(&self, branch: &BranchName) -> bool {
        self.inner.read().contains_key(branch)
    }

    /// move a branch to a new commit hash
    ///
    /// this is a force update - use `update_if_unchanged` for safe
    /// concurrent advancement.
    pub fn update(&self, branch: &BranchName, target: CommitHash) -> StorageResult<()> {
        let mut branches = self.inner.write();
        match branches.get_mut(branch) {
            Some(current) => {
                *current = target;
                Ok(())
            }
            None => Err(StorageError::BranchNotFound(branch.clone())),
        }
    }

    /// move a branch only if it still points at the expected commit
    ///
    /// compare-and-swap semantics: check and set happen under one write
    /// lock, so two callers racing to advance the same branch cannot both
    /// win. Returns `ConcurrentModification` when the expectation fails.
    pub fn update_if_unchanged(
        &self,
        branch: &BranchName,
        expected: &CommitHash,
        target: CommitHash,
    ) -> StorageResult<()> {
        let mut branches = self.inner.write();
        let current = branches
            .get_mut(branch)
            .ok_or_else(|| StorageError::BranchNotFound(branch.clone()))?;
        if current != expected {
            return Err(StorageError::ConcurrentModification {
                branch: branch.clone(),
                expected: expected.clone(),
            });
        }
        *current = target;
        Ok(())
    }

    /// delete a branch
    pub fn delete(&self, branch: &BranchName) -> StorageResult<()> {
        self.inner
            .write()
            .remove(branch)
            .map(|_| ())
            .ok_or_else(|| StorageError::BranchNotFound(branch.clone()))
    }

    /// list all branch names, sorted
    pub fn list(&self) -> Vec<BranchName> {
        let mut names: Vec<BranchName> = self.inner.read().keys().cloned().collect();
        names.sort();
        names
    }
}
