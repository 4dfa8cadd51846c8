//! Typed records bound to collections.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::document::{json_type_name, Document, DocumentId};
use crate::error::{DbError, Result};
use crate::schema::Schema;

/// A record type stored in one collection under one schema.
///
/// Implementors serialize to a flat JSON object. The store-assigned
/// identity, when present, lives in the `_id` field and is typically
/// an `Option<DocumentId>` omitted from the serialized form while
/// unassigned.
pub trait Model: Serialize + DeserializeOwned + Send + Sync {
    /// Collection this type is stored in.
    const COLLECTION: &'static str;

    /// Declared shape checked before every insert and save.
    fn schema() -> Schema;

    /// Store-assigned identity, if this record has been persisted.
    fn id(&self) -> Option<DocumentId>;

    /// Serializes into the stored document form.
    fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self) {
            Ok(Value::Object(doc)) => Ok(doc),
            Ok(other) => Err(DbError::Serialization(format!(
                "model for collection '{}' must serialize to an object, got {}",
                Self::COLLECTION,
                json_type_name(&other)
            ))),
            Err(err) => Err(DbError::Serialization(err.to_string())),
        }
    }

    /// Rebuilds a record from its stored document form.
    fn from_document(doc: Document) -> Result<Self> {
        serde_json::from_value(Value::Object(doc))
            .map_err(|err| DbError::Serialization(err.to_string()))
    }

    /// Checks this record against [`Model::schema`], reporting every
    /// violated field at once.
    fn validate(&self) -> Result<()> {
        let doc = self.to_document()?;
        Self::schema().validate(&doc)?;
        Ok(())
    }
}
