//! Typed persistence facade over raw collections.

use std::marker::PhantomData;

use serde_json::Value;

use crate::collection::Collection;
use crate::connection::Connection;
use crate::document::{Document, ID_FIELD};
use crate::error::{DbError, Result};
use crate::filter::Filter;
use crate::model::Model;
use crate::patch::Patch;

/// Validated CRUD over one model's collection.
///
/// Whole-record writes (`insert_one`, `save`) validate against the
/// model's schema first and report every violated field. Patches
/// (`update_one`, `update_many`) touch only the named fields and are
/// not validated.
pub struct Repository<M: Model> {
    collection: Collection,
    _model: PhantomData<M>,
}

impl<M: Model> Repository<M> {
    /// Binds the facade to `conn`'s collection for `M`.
    pub fn new(conn: &Connection) -> Self {
        Repository {
            collection: conn.collection(M::COLLECTION),
            _model: PhantomData,
        }
    }

    /// Raw, untyped handle to the underlying collection.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// All records matching `filter`, in insertion order.
    pub async fn find(&self, filter: Filter) -> Result<Vec<M>> {
        let docs = self.collection.find(&filter).await?;
        docs.into_iter().map(M::from_document).collect()
    }

    /// First record matching `filter`.
    pub async fn find_one(&self, filter: Filter) -> Result<Option<M>> {
        match self.collection.find_one(&filter).await? {
            Some(doc) => Ok(Some(M::from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Validates and inserts a new record, returning the stored copy
    /// carrying its assigned identity. Any identity already on
    /// `record` is ignored.
    pub async fn insert_one(&self, record: &M) -> Result<M> {
        let doc = self.checked_document(record)?;
        self.insert_document(doc).await
    }

    /// Validates and stores `record`: inserts when it has no identity
    /// yet, otherwise replaces the stored document wholesale. Fails
    /// with [`DbError::NotFound`] when the identity matches nothing.
    pub async fn save(&self, record: &M) -> Result<M> {
        let doc = self.checked_document(record)?;
        match record.id() {
            None => self.insert_document(doc).await,
            Some(id) => {
                let replaced = self.collection.replace_one(id, doc.clone()).await?;
                if replaced == 0 {
                    tracing::debug!(
                        "Save into '{}' found no document with id {}",
                        M::COLLECTION,
                        id
                    );
                    return Err(self.not_found());
                }
                M::from_document(doc)
            }
        }
    }

    /// Applies `patch` to the first record matching `filter`. Returns
    /// how many records changed (0 or 1).
    pub async fn update_one(&self, filter: Filter, patch: Patch) -> Result<u64> {
        self.collection.update_one(&filter, &patch).await
    }

    /// Applies `patch` to every record matching `filter`, returning
    /// the count.
    pub async fn update_many(&self, filter: Filter, patch: Patch) -> Result<u64> {
        self.collection.update_many(&filter, &patch).await
    }

    /// Deletes the first record matching `filter`. Returns 0 or 1.
    pub async fn delete_one(&self, filter: Filter) -> Result<u64> {
        self.collection.delete_one(&filter).await
    }

    /// Deletes every record matching `filter`, returning the count.
    pub async fn delete_many(&self, filter: Filter) -> Result<u64> {
        self.collection.delete_many(&filter).await
    }

    /// Deletes `record` by its identity. Fails with
    /// [`DbError::NotFound`] when the record was never saved or its
    /// document is already gone.
    pub async fn remove(&self, record: &M) -> Result<()> {
        let id = record.id().ok_or_else(|| self.not_found())?;
        if self.collection.remove_by_id(id).await? == 0 {
            return Err(self.not_found());
        }
        Ok(())
    }

    /// Number of stored records matching `filter`.
    pub async fn count(&self, filter: Filter) -> Result<u64> {
        self.collection.count(&filter).await
    }

    fn checked_document(&self, record: &M) -> Result<Document> {
        let doc = record.to_document()?;
        if let Err(err) = M::schema().validate(&doc) {
            tracing::debug!("Rejected write to '{}': {}", M::COLLECTION, err);
            return Err(err.into());
        }
        Ok(doc)
    }

    async fn insert_document(&self, mut doc: Document) -> Result<M> {
        let id = self.collection.insert(doc.clone()).await?;
        doc.insert(ID_FIELD.to_string(), Value::from(id));
        M::from_document(doc)
    }

    fn not_found(&self) -> DbError {
        DbError::NotFound {
            collection: M::COLLECTION.to_string(),
        }
    }
}
