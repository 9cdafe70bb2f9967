//! Catalog module: the typed data model.
//!
//! Values, rows, data types, column definitions, and table schemas live
//! here. The storage and diff layers build on these types but never extend
//! them.

mod schema;
mod types;
mod value;

pub use schema::{Schema, SchemaBuilder, SchemaError};
pub use types::{ColumnDef, DataType};
pub use value::{Row, Value};

pub(crate) use value::row_fingerprint;
