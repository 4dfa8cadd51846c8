//! Documents and their store-assigned identities.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved field holding a document's store-assigned identity.
pub const ID_FIELD: &str = "_id";

/// A single stored record: a JSON object of named fields.
pub type Document = Map<String, Value>;

/// Identity assigned to a document on insert, unique within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(u64);

impl DocumentId {
    pub(crate) fn new(raw: u64) -> Self {
        DocumentId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DocumentId> for Value {
    fn from(id: DocumentId) -> Self {
        Value::from(id.0)
    }
}

/// Reads the identity of a stored document, if present and well formed.
pub fn document_id(doc: &Document) -> Option<DocumentId> {
    doc.get(ID_FIELD).and_then(Value::as_u64).map(DocumentId::new)
}

/// JSON type name as it appears in validation messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
