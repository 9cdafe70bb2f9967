//! Data types and column definitions for schema declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// SQL-like data types supported by ReponoDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Integer numbers (BIGINT in SQL).
    Integer,
    /// Floating point numbers (DOUBLE in SQL).
    Float,
    /// Text/string data.
    Varchar,
    /// Boolean values.
    Boolean,
    /// Timestamps, stored as integer seconds since the epoch.
    Timestamp,
}

impl DataType {
    /// Check if a non-NULL value matches this data type.
    ///
    /// Float columns also accept Integer values (implicitly widened);
    /// Timestamp columns store integers.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (DataType::Integer, Value::Integer(_)) => true,
            (DataType::Float, Value::Float(_) | Value::Integer(_)) => true,
            (DataType::Varchar, Value::Text(_)) => true,
            (DataType::Boolean, Value::Boolean(_)) => true,
            (DataType::Timestamp, Value::Integer(_)) => true,
            _ => false,
        }
    }

    /// Get the SQL name for this type.
    pub fn sql_name(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Float => "FLOAT",
            DataType::Varchar => "VARCHAR",
            DataType::Boolean => "BOOLEAN",
            DataType::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_name())
    }
}

/// Full column definition: name, type, and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name (unique within a schema).
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Whether this column is the table's primary key.
    #[serde(default)]
    pub is_primary_key: bool,
    /// Whether NULL is an acceptable value.
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDef {
    /// Create a new nullable, non-key column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_primary_key: false,
            is_nullable: true,
        }
    }

    /// Mark this column as the primary key (implies NOT NULL).
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    /// Mark this column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    /// Validate a cell value against this column definition.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            if !self.is_nullable {
                return Err(format!("column '{}' cannot be NULL", self.name));
            }
            return Ok(());
        }
        if !self.data_type.matches(value) {
            return Err(format!(
                "column '{}' expects type {}, got {}",
                self.name, self.data_type, value
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.is_primary_key {
            write!(f, " PRIMARY KEY")?;
        }
        if !self.is_nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}
