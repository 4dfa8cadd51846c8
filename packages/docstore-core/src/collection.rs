//! Collections: insertion-ordered documents and the async operations
//! over them.

use std::sync::Arc;

use serde_json::Value;

use crate::connection::StoreInner;
use crate::document::{document_id, Document, DocumentId, ID_FIELD};
use crate::error::Result;
use crate::filter::Filter;
use crate::patch::Patch;

/// Storage for one collection: documents in insertion order plus the
/// identity counter.
#[derive(Debug)]
pub(crate) struct CollectionData {
    next_id: u64,
    documents: Vec<Document>,
}

impl CollectionData {
    pub(crate) fn new() -> Self {
        CollectionData {
            next_id: 1,
            documents: Vec::new(),
        }
    }

    pub(crate) fn from_parts(next_id: u64, documents: Vec<Document>) -> Self {
        CollectionData { next_id, documents }
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn insert(&mut self, mut doc: Document) -> DocumentId {
        let id = DocumentId::new(self.next_id);
        self.next_id += 1;
        doc.insert(ID_FIELD.to_string(), Value::from(id));
        self.documents.push(doc);
        id
    }

    fn find(&self, filter: &Filter) -> Vec<Document> {
        self.documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect()
    }

    fn find_one(&self, filter: &Filter) -> Option<Document> {
        self.documents.iter().find(|doc| filter.matches(doc)).cloned()
    }

    fn replace(&mut self, id: DocumentId, mut doc: Document) -> u64 {
        match self
            .documents
            .iter()
            .position(|stored| document_id(stored) == Some(id))
        {
            Some(index) => {
                doc.insert(ID_FIELD.to_string(), Value::from(id));
                self.documents[index] = doc;
                1
            }
            None => 0,
        }
    }

    fn update(&mut self, filter: &Filter, patch: &Patch, many: bool) -> u64 {
        let mut updated = 0;
        for doc in &mut self.documents {
            if filter.matches(doc) {
                patch.apply(doc);
                updated += 1;
                if !many {
                    break;
                }
            }
        }
        updated
    }

    fn delete(&mut self, filter: &Filter, many: bool) -> u64 {
        if many {
            let before = self.documents.len();
            self.documents.retain(|doc| !filter.matches(doc));
            (before - self.documents.len()) as u64
        } else {
            match self.documents.iter().position(|doc| filter.matches(doc)) {
                Some(index) => {
                    self.documents.remove(index);
                    1
                }
                None => 0,
            }
        }
    }

    fn remove_by_id(&mut self, id: DocumentId) -> u64 {
        match self
            .documents
            .iter()
            .position(|doc| document_id(doc) == Some(id))
        {
            Some(index) => {
                self.documents.remove(index);
                1
            }
            None => 0,
        }
    }

    fn count(&self, filter: &Filter) -> u64 {
        self.documents.iter().filter(|doc| filter.matches(doc)).count() as u64
    }
}

/// Async handle to one named collection.
///
/// Every operation first checks that the owning connection is still
/// open. Update and delete counts report how many documents matched.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    store: Arc<StoreInner>,
}

impl Collection {
    pub(crate) fn new(name: &str, store: Arc<StoreInner>) -> Self {
        Collection {
            name: name.to_string(),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a document and returns its store-assigned identity.
    /// Any identity already present in `doc` is replaced.
    pub async fn insert(&self, doc: Document) -> Result<DocumentId> {
        self.store.ensure_open()?;
        let mut collections = self.store.collections.write().await;
        let data = collections
            .entry(self.name.clone())
            .or_insert_with(CollectionData::new);
        Ok(data.insert(doc))
    }

    /// All documents matching `filter`, in insertion order.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        self.store.ensure_open()?;
        let collections = self.store.collections.read().await;
        Ok(collections
            .get(&self.name)
            .map(|data| data.find(filter))
            .unwrap_or_default())
    }

    /// First document matching `filter`.
    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Document>> {
        self.store.ensure_open()?;
        let collections = self.store.collections.read().await;
        Ok(collections.get(&self.name).and_then(|data| data.find_one(filter)))
    }

    /// Replaces the document with identity `id` wholesale, keeping its
    /// identity. Returns 1 when a document was replaced, 0 otherwise.
    pub async fn replace_one(&self, id: DocumentId, doc: Document) -> Result<u64> {
        self.store.ensure_open()?;
        let mut collections = self.store.collections.write().await;
        Ok(collections
            .get_mut(&self.name)
            .map(|data| data.replace(id, doc))
            .unwrap_or(0))
    }

    /// Applies `patch` to the first matching document.
    pub async fn update_one(&self, filter: &Filter, patch: &Patch) -> Result<u64> {
        self.store.ensure_open()?;
        let mut collections = self.store.collections.write().await;
        Ok(collections
            .get_mut(&self.name)
            .map(|data| data.update(filter, patch, false))
            .unwrap_or(0))
    }

    /// Applies `patch` to every matching document.
    pub async fn update_many(&self, filter: &Filter, patch: &Patch) -> Result<u64> {
        self.store.ensure_open()?;
        let mut collections = self.store.collections.write().await;
        Ok(collections
            .get_mut(&self.name)
            .map(|data| data.update(filter, patch, true))
            .unwrap_or(0))
    }

    /// Deletes the first matching document.
    pub async fn delete_one(&self, filter: &Filter) -> Result<u64> {
        self.store.ensure_open()?;
        let mut collections = self.store.collections.write().await;
        Ok(collections
            .get_mut(&self.name)
            .map(|data| data.delete(filter, false))
            .unwrap_or(0))
    }

    /// Deletes every matching document.
    pub async fn delete_many(&self, filter: &Filter) -> Result<u64> {
        self.store.ensure_open()?;
        let mut collections = self.store.collections.write().await;
        Ok(collections
            .get_mut(&self.name)
            .map(|data| data.delete(filter, true))
            .unwrap_or(0))
    }

    /// Deletes the document with identity `id`.
    pub async fn remove_by_id(&self, id: DocumentId) -> Result<u64> {
        self.store.ensure_open()?;
        let mut collections = self.store.collections.write().await;
        Ok(collections
            .get_mut(&self.name)
            .map(|data| data.remove_by_id(id))
            .unwrap_or(0))
    }

    /// Number of documents matching `filter`.
    pub async fn count(&self, filter: &Filter) -> Result<u64> {
        self.store.ensure_open()?;
        let collections = self.store.collections.read().await;
        Ok(collections
            .get(&self.name)
            .map(|data| data.count(filter))
            .unwrap_or(0))
    }
}
