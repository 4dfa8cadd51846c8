//! Error taxonomy for connection, schema and repository operations.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::schema::FieldType;

/// Convenience alias for fallible store operations.
pub type Result<T> = std::result::Result<T, DbError>;

/// Everything the store can reject.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid connection URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Store unreachable: connection to database '{database}' is closed")]
    ConnectionClosed { database: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No matching document in collection '{collection}'")]
    NotFound { collection: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Data corruption detected: {0}")]
    DataCorruption(String),

    #[error("Snapshot belongs to database '{found}', expected '{expected}'")]
    SnapshotMismatch { expected: String, found: String },
}

/// Every schema violation found in a document, keyed by field name.
///
/// A rejected write reports all offending fields at once rather than
/// stopping at the first.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    violations: BTreeMap<String, Violation>,
}

impl ValidationError {
    pub(crate) fn new(violations: BTreeMap<String, Violation>) -> Self {
        ValidationError { violations }
    }

    /// All violations, ordered by field name.
    pub fn violations(&self) -> &BTreeMap<String, Violation> {
        &self.violations
    }

    /// Whether `field` is among the violated fields.
    pub fn contains(&self, field: &str) -> bool {
        self.violations.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|(field, violation)| format!("{field}: {violation}"))
            .collect();
        write!(f, "Validation failed: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// One field's failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Required field absent or null.
    Missing,
    /// Present but of the wrong JSON type.
    TypeMismatch {
        expected: FieldType,
        got: &'static str,
    },
    /// Present and a string, but empty.
    Empty,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => write!(f, "required field is missing"),
            Violation::TypeMismatch { expected, got } => {
                write!(f, "expected {expected}, got {got}")
            }
            Violation::Empty => write!(f, "must not be empty"),
        }
    }
}
