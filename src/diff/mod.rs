//! Diff engine: structured comparison of two commits.
//!
//! Produces table-level (added/dropped/schema-changed) and row-level
//! (Added/Deleted/Modified) classifications. Results are derived views,
//! never persisted.

mod engine;
mod types;

pub use engine::diff;
pub use types::{CommitDiff, RowChange, RowDiff, TableDiff};
