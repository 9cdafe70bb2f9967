//! ReponoDB - versioning core for a Git-style SQL database
//!
//! This crate layers git-like version control over tabular data: every
//! mutation produces an immutable, content-hashed snapshot commit, commits
//! chain into a history, named branches point at commits, and two commits
//! can be compared to produce a structured diff. "Repono" is Latin for
//! "to store".
//!
//! # Example
//!
//! ```
//! use reponodb::catalog::{ColumnDef, DataType, SchemaBuilder, Value};
//! use reponodb::db::{Database, TableSnapshot};
//! use reponodb::storage::{BranchName, TableName};
//!
//! let db = Database::new().unwrap();
//! let schema = SchemaBuilder::new("users")
//!     .column(ColumnDef::new("id", DataType::Integer).primary_key())
//!     .column(ColumnDef::new("name", DataType::Varchar))
//!     .build()
//!     .unwrap();
//!
//! let main = BranchName::main();
//! let base = db.head(&main).unwrap();
//! db.commit_snapshot(&main, "add neel", vec![TableSnapshot {
//!     name: TableName::new("users").unwrap(),
//!     schema,
//!     rows: vec![vec![Value::Integer(1), Value::Text("Neel".into())]],
//! }]).unwrap();
//!
//! let changes = db.diff_branch_head(&main, &base).unwrap();
//! assert_eq!(changes.tables_added.len(), 1);
//! ```

#![allow(dead_code)] // Many methods are for public API extensibility

pub mod catalog;
pub mod db;
pub mod diff;
pub mod storage;
