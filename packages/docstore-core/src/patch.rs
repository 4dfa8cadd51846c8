//! Field-level updates applied to matched documents.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::document::{Document, ID_FIELD};

/// Set of field assignments applied to every matched document.
///
/// Untouched fields keep their values. Identity is immutable, so an
/// assignment to the identity field is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: BTreeMap<String, Value>,
}

impl Patch {
    pub fn new() -> Self {
        Patch::default()
    }

    /// Assigns `value` to `field` on every matched document.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Applies the assignments to `doc` in place.
    pub fn apply(&self, doc: &mut Document) {
        for (field, value) in &self.fields {
            if field == ID_FIELD {
                continue;
            }
            doc.insert(field.clone(), value.clone());
        }
    }
}
