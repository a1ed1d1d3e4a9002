//! In-Memory Document Store Adapter
//!
//! Keeps documents in memory. Used for tests, demos and as the default
//! store of an editor session.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DocumentId;
use crate::ports::{DocumentStore, DocumentStoreError};

const SAMPLES: [(&str, &str, &str); 3] = [
    (
        "1",
        "Research Paper Draft",
        "# Research Paper Draft\n\nThis is a draft of my research paper.\n\n## Introduction\n\nDescribe your research here...",
    ),
    (
        "2",
        "Literature Review",
        "# Literature Review\n\n## Background\n\nSummarize existing research...",
    ),
    (
        "3",
        "Methodology Section",
        "# Methodology\n\n## Research Design\n\nDescribe your methodology...",
    ),
];

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default)]
struct Inner {
    order: Vec<DocumentId>,
    documents: HashMap<DocumentId, StoredDocument>,
}

/// In-memory storage for documents
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the three sample documents (ids "1" to "3")
    pub fn with_samples() -> Self {
        let mut inner = Inner::default();
        for (id, title, content) in SAMPLES {
            if let Ok(id) = DocumentId::new(id) {
                inner.order.push(id.clone());
                inner.documents.insert(
                    id.clone(),
                    StoredDocument {
                        id,
                        title: title.to_string(),
                        content: content.to_string(),
                    },
                );
            }
        }
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Add or replace a document
    pub async fn insert(&self, id: DocumentId, title: impl Into<String>, content: impl Into<String>) {
        let mut inner = self.inner.write().await;
        if !inner.documents.contains_key(&id) {
            inner.order.push(id.clone());
        }
        inner.documents.insert(
            id.clone(),
            StoredDocument {
                id,
                title: title.into(),
                content: content.into(),
            },
        );
    }

    /// All documents in insertion order
    pub async fn documents(&self) -> Vec<StoredDocument> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.documents.get(id).cloned())
            .collect()
    }

    /// Get the number of stored documents
    pub async fn document_count(&self) -> usize {
        self.inner.read().await.documents.len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_content(&self, id: &DocumentId) -> Result<String, DocumentStoreError> {
        let inner = self.inner.read().await;
        inner
            .documents
            .get(id)
            .map(|doc| doc.content.clone())
            .ok_or_else(|| DocumentStoreError::NotFound(id.clone()))
    }

    async fn set_content(&self, id: &DocumentId, content: String) -> Result<(), DocumentStoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner
            .documents
            .get_mut(id)
            .ok_or_else(|| DocumentStoreError::NotFound(id.clone()))?;
        doc.content = content;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> DocumentId {
        DocumentId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn samples_are_seeded_in_order() {
        let store = InMemoryDocumentStore::with_samples();

        let docs = store.documents().await;
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Research Paper Draft", "Literature Review", "Methodology Section"]
        );

        let content = store.get_content(&id("2")).await.unwrap();
        assert!(content.starts_with("# Literature Review"));
    }

    #[tokio::test]
    async fn set_content_replaces_whole_text() {
        let store = InMemoryDocumentStore::new();
        store.insert(id("a"), "A", "old").await;

        store.set_content(&id("a"), "new".to_string()).await.unwrap();

        assert_eq!(store.get_content(&id("a")).await.unwrap(), "new");
        assert_eq!(store.document_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_document_is_not_found() {
        let store = InMemoryDocumentStore::new();

        let err = store.get_content(&id("missing")).await.unwrap_err();
        assert_eq!(err, DocumentStoreError::NotFound(id("missing")));

        let err = store.set_content(&id("missing"), String::new()).await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn reinserting_keeps_position() {
        let store = InMemoryDocumentStore::new();
        store.insert(id("a"), "A", "1").await;
        store.insert(id("b"), "B", "2").await;
        store.insert(id("a"), "A2", "3").await;

        let docs = store.documents().await;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "A2");
    }
}
