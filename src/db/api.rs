//! Database API - high-level interface over the versioning core.
//!
//! Ties the commit store, branch registry, and diff engine together for
//! callers such as a SQL front-end: every accepted mutation becomes a
//! snapshot commit, and branch advancement is compare-and-swap so racing
//! writers cannot lose updates.

use thiserror::Error;

use crate::catalog::{Row, Schema, SchemaError};
use crate::diff::{self, CommitDiff};
use crate::storage::{
    BranchName, BranchRegistry, Commit, CommitBuilder, CommitHash, CommitStore, InvalidNameError,
    StorageError, TableName,
};

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("invalid name: {0}")]
    InvalidName(#[from] InvalidNameError),
}

/// One table's schema and rows, as handed over by the front-end.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub name: TableName,
    pub schema: Schema,
    pub rows: Vec<Row>,
}

/// The versioned database: a commit store plus a branch registry.
///
/// Clone this to share across threads - both members use Arc internally.
#[derive(Clone)]
pub struct Database {
    store: CommitStore,
    branches: BranchRegistry,
}

impl Database {
    /// Create a database with an empty root commit on the main branch.
    pub fn new() -> DatabaseResult<Self> {
        let db = Self {
            store: CommitStore::new(),
            branches: BranchRegistry::new(),
        };

        let root = CommitBuilder::new()
            .message("initialize repository")
            .build()?;
        let root_hash = db.store.put(root)?;
        db.branches.create(&BranchName::main(), root_hash)?;

        Ok(db)
    }

    /// The commit a branch currently points at.
    pub fn head(&self, branch: &BranchName) -> DatabaseResult<CommitHash> {
        Ok(self.branches.resolve(branch)?)
    }

    /// Fetch a commit, verifying its content addressing.
    pub fn get_commit(&self, hash: &CommitHash) -> DatabaseResult<Commit> {
        Ok(self.store.get_verified(hash)?)
    }

    /// Record a new whole-state snapshot as a child of the branch head.
    ///
    /// Rows are validated against their schemas during the build; the
    /// branch advances by compare-and-swap against the head observed here,
    /// so a racing writer surfaces as `ConcurrentModification` instead of
    /// a lost update.
    pub fn commit_snapshot(
        &self,
        branch: &BranchName,
        message: impl Into<String>,
        tables: Vec<TableSnapshot>,
    ) -> DatabaseResult<CommitHash> {
        let parent = self.branches.resolve(branch)?;

        let mut builder = CommitBuilder::new().parent(parent.clone()).message(message);
        for table in tables {
            builder = builder.table(table.name, table.schema, table.rows);
        }
        let commit = builder.build()?;

        let hash = self.store.put(commit)?;
        self.branches.update_if_unchanged(branch, &parent, hash.clone())?;
        Ok(hash)
    }

    /// Walk a branch's history from head to root, newest first.
    pub fn history(&self, branch: &BranchName) -> DatabaseResult<Vec<Commit>> {
        let head = self.branches.resolve(branch)?;
        Ok(self.store.history(&head)?)
    }

    /// Structured diff between two commits.
    ///
    /// Both commits are verified before comparison; a tampered commit
    /// fails here rather than producing a diff over untrusted content.
    pub fn diff(&self, from: &CommitHash, to: &CommitHash) -> DatabaseResult<CommitDiff> {
        let from = self.store.get_verified(from)?;
        let to = self.store.get_verified(to)?;
        Ok(diff::diff(&from, &to))
    }

    /// Diff a commit against a branch's current head.
    pub fn diff_branch_head(
        &self,
        branch: &BranchName,
        from: &CommitHash,
    ) -> DatabaseResult<CommitDiff> {
        let head = self.branches.resolve(branch)?;
        self.diff(from, &head)
    }

    /// Create a branch pointing at an existing commit.
    ///
    /// The registry itself never inspects the commit space, so the
    /// existence check lives here.
    pub fn create_branch(&self, branch: &BranchName, target: &CommitHash) -> DatabaseResult<()> {
        if !self.store.contains(target) {
            return Err(StorageError::CommitNotFound(target.clone()).into());
        }
        Ok(self.branches.create(branch, target.clone())?)
    }

    /// Delete a branch. The commits it pointed at remain stored.
    pub fn delete_branch(&self, branch: &BranchName) -> DatabaseResult<()> {
        Ok(self.branches.delete(branch)?)
    }

    /// List all branch names, sorted.
    pub fn list_branches(&self) -> Vec<BranchName> {
        self.branches.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColumnDef, DataType, SchemaBuilder, Value};
    use crate::diff::RowChange;

    fn users_schema() -> Schema {
        SchemaBuilder::new("users")
            .column(ColumnDef::new("id", DataType::Integer).primary_key())
            .column(ColumnDef::new("name", DataType::Varchar))
            .build()
            .unwrap()
    }

    fn users_snapshot(rows: Vec<Row>) -> TableSnapshot {
        TableSnapshot {
            name: TableName::new("users").unwrap(),
            schema: users_schema(),
            rows,
        }
    }

    fn neel() -> Row {
        vec![Value::Integer(1), Value::Text("Neel".into())]
    }

    fn swati() -> Row {
        vec![Value::Integer(2), Value::Text("Swati".into())]
    }

    #[test]
    fn test_new_database_has_root_on_main() {
        let db = Database::new().unwrap();
        let head = db.head(&BranchName::main()).unwrap();
        let root = db.get_commit(&head).unwrap();
        assert!(root.is_root());
        assert_eq!(db.list_branches(), vec![BranchName::main()]);
    }

    #[test]
    fn test_commit_snapshot_advances_branch() {
        let db = Database::new().unwrap();
        let main = BranchName::main();
        let root = db.head(&main).unwrap();

        let hash = db
            .commit_snapshot(&main, "create users", vec![users_snapshot(vec![neel()])])
            .unwrap();

        assert_eq!(db.head(&main).unwrap(), hash);
        let commit = db.get_commit(&hash).unwrap();
        assert_eq!(commit.parent(), Some(&root));
        assert_eq!(commit.message(), "create users");
    }

    #[test]
    fn test_history_walks_to_root() {
        let db = Database::new().unwrap();
        let main = BranchName::main();
        db.commit_snapshot(&main, "first", vec![users_snapshot(vec![neel()])])
            .unwrap();
        db.commit_snapshot(&main, "second", vec![users_snapshot(vec![neel(), swati()])])
            .unwrap();

        let history = db.history(&main).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].message(), "second");
        assert_eq!(history[1].message(), "first");
        assert!(history[2].is_root());
    }

    #[test]
    fn test_diff_between_snapshots() {
        let db = Database::new().unwrap();
        let main = BranchName::main();
        let a = db
            .commit_snapshot(&main, "first", vec![users_snapshot(vec![neel()])])
            .unwrap();
        let b = db
            .commit_snapshot(&main, "second", vec![users_snapshot(vec![neel(), swati()])])
            .unwrap();

        let result = db.diff(&a, &b).unwrap();
        assert!(result.tables_added.is_empty());
        assert!(result.tables_dropped.is_empty());
        let diffs = &result.table_diffs[0].row_diffs;
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].change, RowChange::Added);
        assert_eq!(diffs[0].new_row.as_ref().unwrap(), &swati());

        // the branch head variant agrees
        let head_diff = db.diff_branch_head(&main, &a).unwrap();
        assert_eq!(head_diff, result);
    }

    #[test]
    fn test_branch_management() {
        let db = Database::new().unwrap();
        let main = BranchName::main();
        let base = db
            .commit_snapshot(&main, "base", vec![users_snapshot(vec![neel()])])
            .unwrap();

        let feature = BranchName::new("feature").unwrap();
        db.create_branch(&feature, &base).unwrap();
        assert_eq!(db.head(&feature).unwrap(), base);

        // the feature branch advances independently of main
        db.commit_snapshot(&feature, "tweak", vec![users_snapshot(vec![neel(), swati()])])
            .unwrap();
        assert_eq!(db.head(&main).unwrap(), base);
        assert_ne!(db.head(&feature).unwrap(), base);

        db.delete_branch(&feature).unwrap();
        assert!(db.head(&feature).is_err());
        // commits outlive the branch pointer
        assert!(db.get_commit(&base).is_ok());
    }

    #[test]
    fn test_create_branch_requires_existing_commit() {
        let db = Database::new().unwrap();
        let missing = CommitHash::from_hex("c".repeat(64)).unwrap();
        let result = db.create_branch(&BranchName::new("nowhere").unwrap(), &missing);
        assert!(matches!(
            result,
            Err(DatabaseError::Storage(StorageError::CommitNotFound(_)))
        ));
    }

    #[test]
    fn test_invalid_snapshot_leaves_state_untouched() {
        let db = Database::new().unwrap();
        let main = BranchName::main();
        let head_before = db.head(&main).unwrap();

        // NULL primary key violates the schema
        let result = db.commit_snapshot(
            &main,
            "bad",
            vec![users_snapshot(vec![vec![Value::Null, Value::Null]])],
        );
        assert!(matches!(
            result,
            Err(DatabaseError::Storage(StorageError::SchemaViolation { .. }))
        ));
        assert_eq!(db.head(&main).unwrap(), head_before);
        assert_eq!(db.history(&main).unwrap().len(), 1);
    }
}
