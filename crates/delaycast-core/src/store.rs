//! In-memory record store
//!
//! A collection-oriented store modelled on a document database. Each
//! collection keeps its documents in insertion order behind its own lock, so
//! concurrent writers can never interleave inside a single collection.
//! Nothing is persisted; dropping the store drops every record.

use crate::types::{Inference, ModelPayload};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Name of the collection holding encoded models
pub const MODELS: &str = "models";

/// Name of the collection holding inference records
pub const INFERENCES: &str = "inferences";

/// Opaque identifier assigned by the store on insertion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A stored record: store-assigned metadata plus the record body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
    /// Identifier assigned on insertion
    pub id: RecordId,

    /// Insertion timestamp
    pub created_at: DateTime<Utc>,

    /// Record body, flattened next to the metadata when serialized
    #[serde(flatten)]
    pub body: T,
}

/// A named, insertion-ordered collection of documents
pub struct Collection<T> {
    name: &'static str,
    documents: RwLock<Vec<Document<T>>>,
}

impl<T: Clone> Collection<T> {
    /// Create an empty collection
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Append a record and return its new identifier
    pub fn insert(&self, body: T) -> RecordId {
        self.insert_returning(body).id
    }

    /// Append a record and return a copy of the stored document
    pub fn insert_returning(&self, body: T) -> Document<T> {
        let document = Document {
            id: RecordId::generate(),
            created_at: Utc::now(),
            body,
        };

        let mut documents = self.documents.write();
        documents.push(document.clone());
        debug!(collection = self.name, id = %document.id, count = documents.len(), "record inserted");

        document
    }

    /// Snapshot of every document in insertion order
    pub fn find_all(&self) -> Vec<Document<T>> {
        self.documents.read().clone()
    }

    /// The earliest inserted document, if any
    pub fn find_first(&self) -> Option<Document<T>> {
        self.documents.read().first().cloned()
    }

    /// The most recently inserted document, if any
    pub fn find_last(&self) -> Option<Document<T>> {
        self.documents.read().last().cloned()
    }

    /// Look up a document by identifier
    pub fn find_by_id(&self, id: &RecordId) -> Option<Document<T>> {
        self.documents.read().iter().find(|d| &d.id == id).cloned()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Whether the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Remove every document
    pub fn clear(&self) {
        self.documents.write().clear();
    }
}

/// Process-scoped store holding the `models` and `inferences` collections
///
/// Constructed once at startup and handed to each service as an `Arc`.
pub struct RecordStore {
    models: Collection<ModelPayload>,
    inferences: Collection<Inference>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            models: Collection::new(MODELS),
            inferences: Collection::new(INFERENCES),
        }
    }

    /// Create an empty store behind a shared handle
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// The `models` collection
    pub fn models(&self) -> &Collection<ModelPayload> {
        &self.models
    }

    /// The `inferences` collection
    pub fn inferences(&self) -> &Collection<Inference> {
        &self.inferences
    }

    /// Drop every record in every collection
    pub fn reset(&self) {
        self.models.clear();
        self.inferences.clear();
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn fresh_store_is_empty() {
        let store = RecordStore::new();
        assert!(store.models().is_empty());
        assert!(store.inferences().is_empty());
    }

    #[test]
    fn first_last_and_lookup() {
        let collection: Collection<u32> = Collection::new("numbers");
        assert!(collection.find_first().is_none());

        let a = collection.insert(1);
        let _ = collection.insert(2);
        let c = collection.insert(3);

        assert_eq!(collection.find_first().map(|d| d.id), Some(a));
        assert_eq!(collection.find_last().map(|d| d.id.clone()), Some(c.clone()));
        assert_eq!(collection.find_by_id(&c).map(|d| d.body), Some(3));
        assert!(collection.find_by_id(&RecordId::from("missing")).is_none());
    }

    #[test]
    fn clear_empties_collection() {
        let collection: Collection<&str> = Collection::new("words");
        collection.insert("a");
        collection.insert("b");
        collection.clear();
        assert_eq!(collection.len(), 0);
    }

    #[test]
    fn concurrent_inserts_are_all_kept() {
        let collection = Arc::new(Collection::<usize>::new("threads"));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let collection = collection.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        collection.insert(t * 1000 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let docs = collection.find_all();
        assert_eq!(docs.len(), 400);
        let ids: HashSet<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids.len(), 400);
    }

    #[test]
    fn document_serializes_flat() {
        let collection: Collection<serde_json::Value> = Collection::new("docs");
        collection.insert(serde_json::json!({"kind": "test"}));
        let doc = collection.find_first().unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["kind"], "test");
        assert_eq!(value["id"], doc.id.as_str());
        assert!(value.get("created_at").is_some());
    }

    proptest! {
        #[test]
        fn insertion_order_is_preserved(values in proptest::collection::vec(any::<i64>(), 0..64)) {
            let collection: Collection<i64> = Collection::new("prop");
            let ids: Vec<_> = values.iter().map(|v| collection.insert(*v)).collect();

            let docs = collection.find_all();
            prop_assert_eq!(docs.len(), values.len());
            for ((doc, id), value) in docs.iter().zip(&ids).zip(&values) {
                prop_assert_eq!(&doc.id, id);
                prop_assert_eq!(doc.body, *value);
            }
        }
    }
}
