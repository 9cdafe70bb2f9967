//! High-level database façade.
//!
//! The entry point for callers (e.g. a SQL front-end): snapshot commits,
//! history walks, branch management, and diffs behind one handle.

mod api;

pub use api::{Database, DatabaseError, DatabaseResult, TableSnapshot};
