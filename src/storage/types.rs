//! type-safe wrappers for the storage layer.
//!
//! commit hashes, table names, and branch names are all strings on the
//! wire, so each gets a validated newtype to keep them from being mixed up.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A content-derived commit identifier: 64 lowercase hex characters.
///
/// Produced by hashing the commit's canonical serialization; never
/// constructed from arbitrary input without validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitHash(String);

impl CommitHash {
    /// expected length of a hex-encoded 256-bit digest
    pub const HEX_LEN: usize = 64;

    /// parse a CommitHash from a hex string, validating shape
    pub fn from_hex(hex: impl Into<String>) -> Result<Self, InvalidNameError> {
        let hex = hex.into();
        if hex.len() != Self::HEX_LEN {
            return Err(InvalidNameError::BadHashLength(hex.len()));
        }
        if let Some(c) = hex
            .chars()
            .find(|c| !c.is_ascii_hexdigit() || c.is_ascii_uppercase())
        {
            return Err(InvalidNameError::BadHashCharacter(c));
        }
        Ok(Self(hex))
    }

    /// wrap a digest the crate itself produced (already well-formed)
    pub(crate) fn from_digest(hex: String) -> Self {
        debug_assert_eq!(hex.len(), Self::HEX_LEN);
        Self(hex)
    }

    /// short form for log and display purposes
    pub fn short(&self) -> &str {
        &self.0[..7]
    }

    /// get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CommitHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated table name.
///
/// Valid names:
/// - 1-64 characters
/// - alphanumeric, underscores, hyphens only
/// - must start with a letter or underscore
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableName(String);

impl TableName {
    /// create a new TableName, validating the input
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidNameError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), InvalidNameError> {
        if name.is_empty() {
            return Err(InvalidNameError::Empty);
        }
        if name.len() > 64 {
            return Err(InvalidNameError::TooLong(name.len()));
        }
        let first = name.chars().next().unwrap();
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(InvalidNameError::InvalidStart(first));
        }
        for (i, c) in name.chars().enumerate() {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
                return Err(InvalidNameError::InvalidCharacter { char: c, position: i });
            }
        }
        Ok(())
    }

    /// get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// convert to owned String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// a branch name: the only mutable handle into the commit space
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchName(String);

impl BranchName {
    /// the main branch name
    pub const MAIN: &'static str = "main";

    /// create a new BranchName
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(InvalidNameError::Empty);
        }
        if name.contains("..") || name.starts_with('/') || name.ends_with('/') {
            return Err(InvalidNameError::InvalidPath(name));
        }
        if name.chars().any(|c| c.is_ascii_whitespace() || c.is_ascii_control()) {
            return Err(InvalidNameError::InvalidPath(name));
        }
        Ok(Self(name))
    }

    /// the main branch
    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    /// get the short name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// error type for invalid names and identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidNameError {
    Empty,
    TooLong(usize),
    InvalidStart(char),
    InvalidCharacter { char: char, position: usize },
    InvalidPath(String),
    BadHashLength(usize),
    BadHashCharacter(char),
}

impl fmt::Display for InvalidNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name cannot be empty"),
            Self::TooLong(len) => write!(f, "name too long: {} characters", len),
            Self::InvalidStart(c) => write!(f, "name cannot start with '{}'", c),
            Self::InvalidCharacter { char, position } => {
                write!(f, "invalid character '{}' at position {}", char, position)
            }
            Self::InvalidPath(path) => write!(f, "invalid name: '{}'", path),
            Self::BadHashLength(len) => {
                write!(f, "commit hash must be {} hex characters, got {}", CommitHash::HEX_LEN, len)
            }
            Self::BadHashCharacter(c) => {
                write!(f, "commit hash must be lowercase hex, found '{}'", c)
            }
        }
    }
}

impl std::error::Error for InvalidNameError {}
