//! Structured diff results.
//!
//! These are pure, on-demand derived views over two commits; they are never
//! persisted and carry no identity of their own.

use serde::{Deserialize, Serialize};

use crate::catalog::Row;
use crate::storage::{CommitHash, TableName};

/// The classification of a single row difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowChange {
    Added,
    Deleted,
    Modified,
}

/// One row-level difference within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDiff {
    /// What happened to the row.
    pub change: RowChange,
    /// The row as it was in the `from` commit (Deleted and Modified).
    pub old_row: Option<Row>,
    /// The row as it is in the `to` commit (Added and Modified).
    pub new_row: Option<Row>,
}

impl RowDiff {
    /// A row present only in the `to` commit.
    pub fn added(new_row: Row) -> Self {
        Self {
            change: RowChange::Added,
            old_row: None,
            new_row: Some(new_row),
        }
    }

    /// A row present only in the `from` commit.
    pub fn deleted(old_row: Row) -> Self {
        Self {
            change: RowChange::Deleted,
            old_row: Some(old_row),
            new_row: None,
        }
    }

    /// A key-matched row whose cells differ between the commits.
    pub fn modified(old_row: Row, new_row: Row) -> Self {
        Self {
            change: RowChange::Modified,
            old_row: Some(old_row),
            new_row: Some(new_row),
        }
    }
}

/// Differences within one table that exists in both commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDiff {
    /// The table being compared.
    pub table: TableName,
    /// Whether the schema layout changed between the two commits.
    pub schema_changed: bool,
    /// Row-level changes: Deleted/Modified in `from` scan order, then
    /// Added in `to` row order.
    pub row_diffs: Vec<RowDiff>,
}

impl TableDiff {
    /// Check if this table is unchanged.
    pub fn is_empty(&self) -> bool {
        !self.schema_changed && self.row_diffs.is_empty()
    }
}

/// The full structured difference between two commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDiff {
    /// Hash of the `from` commit.
    pub from: CommitHash,
    /// Hash of the `to` commit.
    pub to: CommitHash,
    /// Tables present in `to` but not `from`, in ascending name order.
    pub tables_added: Vec<TableName>,
    /// Tables present in `from` but not `to`, in ascending name order.
    pub tables_dropped: Vec<TableName>,
    /// Per-table differences for tables present in both.
    pub table_diffs: Vec<TableDiff>,
}

impl CommitDiff {
    /// Check if the two commits have identical content.
    pub fn is_empty(&self) -> bool {
        self.tables_added.is_empty()
            && self.tables_dropped.is_empty()
            && self.table_diffs.iter().all(TableDiff::is_empty)
    }
}
