//! Table schema definitions and row validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::ColumnDef;
use super::value::Row;

/// Schema-related errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("column count mismatch: row has {found} values, schema has {expected} columns")]
    ColumnCountMismatch { expected: usize, found: usize },

    #[error("invalid row: {0}")]
    InvalidRow(String),

    #[error("schema has no columns")]
    Empty,
}

/// Table schema: an ordered list of column definitions plus a name→index
/// map kept in sync with it.
///
/// The map is derived state and is rebuilt as part of deserialization, so
/// a schema is consistent no matter how it was constructed. Equality is
/// defined over the ordered column list only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaRepr")]
pub struct Schema {
    /// Table name.
    pub name: String,
    /// Column definitions, in declaration order.
    columns: Vec<ColumnDef>,
    /// Name → position lookup, always consistent with `columns`.
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Schema {
    /// Create an empty schema for a table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a column.
    ///
    /// Rejects a name that already exists; silently overwriting the index
    /// entry would leave a stale duplicate in the ordered list.
    pub fn add_column(&mut self, column: ColumnDef) -> Result<(), SchemaError> {
        if self.index.contains_key(&column.name) {
            return Err(SchemaError::DuplicateColumn(column.name.clone()));
        }
        self.index.insert(column.name.clone(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Get the position of a column by name.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Get a column definition by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.get_column_index(name).map(|i| &self.columns[i])
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The ordered column definitions.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Position of the primary-key column, if one is declared.
    pub fn primary_key_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.is_primary_key)
    }

    /// Validate a row against this schema.
    ///
    /// Checks the length first, then validates cell-by-cell and fails fast
    /// on the first offending cell.
    pub fn validate_row(&self, row: &Row) -> Result<(), SchemaError> {
        if row.len() != self.columns.len() {
            return Err(SchemaError::ColumnCountMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(row) {
            column.validate(value).map_err(SchemaError::InvalidRow)?;
        }
        Ok(())
    }
}

/// Serialized shape of a schema: the derived index map is not stored.
#[derive(Deserialize)]
struct SchemaRepr {
    name: String,
    columns: Vec<ColumnDef>,
}

/// Deserialization goes through `add_column`, rebuilding the name→index
/// map and rejecting duplicate column names in untrusted input.
impl TryFrom<SchemaRepr> for Schema {
    type Error = SchemaError;

    fn try_from(repr: SchemaRepr) -> Result<Self, SchemaError> {
        let mut schema = Schema::new(repr.name);
        for column in repr.columns {
            schema.add_column(column)?;
        }
        Ok(schema)
    }
}

/// Two schemas are equal when their column lists match positionally in
/// name, type, nullability, and primary-key flag. This is the comparison
/// the diff engine uses for `schema_changed`.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

/// Builder for creating table schemas.
pub struct SchemaBuilder {
    name: String,
    columns: Vec<ColumnDef>,
}

impl SchemaBuilder {
    /// Start building a new schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column definition.
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Build the schema, rejecting duplicate column names.
    pub fn build(self) -> Result<Schema, SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut schema = Schema::new(self.name);
        for column in self.columns {
            schema.add_column(column)?;
        }
        Ok(schema)
    }
}
