//! storage layer for ReponoDB
//!
//! this module owns the versioning primitives: content-hashed commit
//! objects, the hash-addressed commit store, and the branch registry.
//! The upper layers (database façade, diff engine) use this API and never
//! construct hashes by hand.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Database                          │
//! │     (snapshot commits, history, branches, diffs)        │
//! └─────────────────────────────────────────────────────────┘
//!                │                          │
//!                ▼                          ▼
//!       ┌───────────────┐          ┌────────────────┐
//!       │  CommitStore  │          │ BranchRegistry │
//!       │ (hash→commit) │          │ (name→hash)    │
//!       └───────────────┘          └────────────────┘
//!                │
//!                ▼
//!       ┌───────────────┐
//!       │    Commit     │
//!       │ (canonical    │
//!       │  bytes, hash) │
//!       └───────────────┘
//! ```
//!
//! Commits are immutable after construction and addressed by the SHA-256
//! digest of their canonical serialization; branches are the only mutable
//! entity and advance by fast-forward or compare-and-swap.

mod commit;
mod error;
mod refs;
mod store;
mod types;

// Re-export public API
pub use commit::{digest, Commit, CommitBuilder};
pub use error::{StorageError, StorageResult};
pub use refs::BranchRegistry;
pub use store::CommitStore;
pub use types::{BranchName, CommitHash, InvalidNameError, TableName};
