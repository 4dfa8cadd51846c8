//! Equality filters over document fields.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::document::{Document, DocumentId, ID_FIELD};

/// Conjunction of field equality conditions.
///
/// An empty filter matches every document in the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: BTreeMap<String, Value>,
}

impl Filter {
    /// Filter with no conditions, matching every document.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Filter matching the single document with identity `id`.
    pub fn by_id(id: DocumentId) -> Self {
        Filter::new().eq(ID_FIELD, id)
    }

    /// Adds an equality condition on `field`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `doc` satisfies every condition.
    pub fn matches(&self, doc: &Document) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}
